//! End-to-end repository tests against a real PostgreSQL.
//!
//! Set `DATABASE_URL` (or put it in `.env`) to run them; without it every test
//! returns early. Each test works on `TEMP` tables inside a transaction that is
//! rolled back, so the target database is left untouched.

use lightbnb_db::{
    Database, DbConfig, NewProperty, NewUser, PropertyFilter, StoreError, properties,
    reservations, users,
};

const SCHEMA: &str = r#"
CREATE TEMP TABLE users (
    id SERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password VARCHAR(255) NOT NULL
) ON COMMIT DROP;

CREATE TEMP TABLE properties (
    id SERIAL PRIMARY KEY,
    owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    thumbnail_photo_url VARCHAR(255) NOT NULL,
    cover_photo_url VARCHAR(255) NOT NULL,
    cost_per_night INTEGER NOT NULL DEFAULT 0,
    parking_spaces INTEGER NOT NULL DEFAULT 0,
    number_of_bathrooms INTEGER NOT NULL DEFAULT 0,
    number_of_bedrooms INTEGER NOT NULL DEFAULT 0,
    country VARCHAR(255) NOT NULL,
    street VARCHAR(255) NOT NULL,
    city VARCHAR(255) NOT NULL,
    province VARCHAR(255) NOT NULL,
    post_code VARCHAR(255) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE
) ON COMMIT DROP;

CREATE TEMP TABLE reservations (
    id SERIAL PRIMARY KEY,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE
) ON COMMIT DROP;

CREATE TEMP TABLE property_reviews (
    id SERIAL PRIMARY KEY,
    guest_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    reservation_id INTEGER REFERENCES reservations(id) ON DELETE CASCADE,
    rating SMALLINT NOT NULL DEFAULT 0,
    message TEXT
) ON COMMIT DROP;
"#;

async fn connect() -> Option<Database> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DbConfig::from_url(&url).expect("DATABASE_URL must be a postgres URL");
    Some(Database::connect(&config).expect("failed to build pool"))
}

/// Open a pooled client and a transaction with the temp schema in place.
macro_rules! setup {
    ($client:ident, $tx:ident) => {
        let Some(db) = connect().await else {
            return;
        };
        let mut $client = db.client().await.expect("pool checkout");
        let $tx = $client.transaction().await.expect("begin");
        $tx.batch_execute(SCHEMA).await.expect("create temp schema");
    };
}

fn user(name: &str, email: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: "$2a$10$FB/BOAVhpuLvpOREQVmvmezD4ED/.JBIDRh70tGevYzYzQgFId2u.".to_string(),
    }
}

fn listing(owner_id: i32, title: &str, city: &str, price: i32) -> NewProperty {
    NewProperty {
        owner_id,
        title: title.to_string(),
        description: Some(format!("{title} in {city}")),
        thumbnail_photo_url: "https://images.example.com/thumb.jpg".to_string(),
        cover_photo_url: "https://images.example.com/cover.jpg".to_string(),
        cost_per_night: price,
        parking_spaces: 1,
        number_of_bathrooms: 1,
        number_of_bedrooms: 2,
        country: "Canada".to_string(),
        street: "100 Main St".to_string(),
        city: city.to_string(),
        province: "BC".to_string(),
        post_code: "V5K 0A1".to_string(),
    }
}

struct Fixture {
    owner_a: i32,
    owner_b: i32,
    guest: i32,
    /// Vancouver, 45/night, rated 5 and 4.
    cheap: i32,
    /// North Vancouver, 120/night, rated 3 and 2.
    pricey: i32,
    /// Calgary, 80/night, rated 4.
    mid: i32,
    /// Toronto, 50/night, rated 5.
    exact_fifty: i32,
}

async fn seed(tx: &deadpool_postgres::Transaction<'_>) -> Fixture {
    let owner_a = users::add_user(tx, &user("Owner A", "a@example.com")).await.unwrap().id;
    let owner_b = users::add_user(tx, &user("Owner B", "b@example.com")).await.unwrap().id;
    let guest = users::add_user(tx, &user("Guest", "guest@example.com")).await.unwrap().id;

    let cheap = properties::add_property(tx, &listing(owner_a, "Studio", "Vancouver", 45))
        .await
        .unwrap();
    assert_eq!(cheap.cost_per_night, 4_500);
    let pricey = properties::add_property(tx, &listing(owner_b, "Penthouse", "North Vancouver", 120))
        .await
        .unwrap()
        .id;
    let mid = properties::add_property(tx, &listing(owner_a, "Bungalow", "Calgary", 80))
        .await
        .unwrap()
        .id;
    let exact_fifty = properties::add_property(tx, &listing(owner_b, "Condo", "Toronto", 50))
        .await
        .unwrap()
        .id;
    // Never reviewed, so never listed.
    properties::add_property(tx, &listing(owner_a, "Shack", "Halifax", 20))
        .await
        .unwrap();

    let cheap = cheap.id;
    tx.batch_execute(&format!(
        "INSERT INTO property_reviews (guest_id, property_id, rating) VALUES
            ({guest}, {cheap}, 5), ({guest}, {cheap}, 4),
            ({guest}, {pricey}, 3), ({guest}, {pricey}, 2),
            ({guest}, {mid}, 4),
            ({guest}, {exact_fifty}, 5);"
    ))
    .await
    .unwrap();

    Fixture {
        owner_a,
        owner_b,
        guest,
        cheap,
        pricey,
        mid,
        exact_fifty,
    }
}

fn costs(listings: &[lightbnb_db::PropertyListing]) -> Vec<i32> {
    listings.iter().map(|l| l.property.cost_per_night).collect()
}

#[tokio::test]
async fn ping_reaches_the_database() {
    let Some(db) = connect().await else {
        return;
    };
    db.ping().await.unwrap();
    db.close();
    assert!(db.is_closed());
}

#[tokio::test]
async fn added_user_is_found_by_email_and_id() {
    setup!(client, tx);
    let added = users::add_user(&tx, &user("Devin Sanders", "tristanjacobs@gmail.com"))
        .await
        .unwrap();

    let by_email = users::get_user_with_email(&tx, "tristanjacobs@gmail.com")
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(by_email.name, "Devin Sanders");
    assert_eq!(by_email.email, "tristanjacobs@gmail.com");
    assert_eq!(by_email.id, added.id);

    let by_id = users::get_user_with_id(&tx, added.id).await.unwrap();
    assert_eq!(by_id, Some(added));
}

#[tokio::test]
async fn unknown_email_is_not_found_rather_than_failure() {
    setup!(client, tx);
    let found = users::get_user_with_email(&tx, "nobody@example.com").await;
    assert!(matches!(found, Ok(None)));
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    setup!(client, tx);
    users::add_user(&tx, &user("First", "same@example.com")).await.unwrap();
    let err = users::add_user(&tx, &user("Second", "same@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation(), "{err:?}");
}

#[tokio::test]
async fn property_for_missing_owner_is_a_foreign_key_violation() {
    setup!(client, tx);
    let err = properties::add_property(&tx, &listing(9_999, "Ghost", "Nowhere", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ForeignKeyViolation(_)), "{err:?}");
}

#[tokio::test]
async fn unfiltered_search_is_limited_and_cheapest_first() {
    setup!(client, tx);
    seed(&tx).await;

    let all = properties::get_all_properties(&tx, &PropertyFilter::new(), None)
        .await
        .unwrap();
    assert_eq!(costs(&all), vec![4_500, 5_000, 8_000, 12_000]);

    let two = properties::get_all_properties(&tx, &PropertyFilter::new(), Some(2))
        .await
        .unwrap();
    assert_eq!(costs(&two), vec![4_500, 5_000]);
}

#[tokio::test]
async fn minimum_rating_filters_on_the_average() {
    setup!(client, tx);
    let f = seed(&tx).await;

    let rated = properties::get_all_properties(&tx, &PropertyFilter::new().minimum_rating(4.0), None)
        .await
        .unwrap();
    let ids: Vec<i32> = rated.iter().map(|l| l.property.id).collect();
    assert_eq!(ids, vec![f.cheap, f.exact_fifty, f.mid]);
    assert!(rated.iter().all(|l| l.average_rating >= 4.0));
    assert_eq!(rated[0].average_rating, 4.5);
}

#[tokio::test]
async fn minimum_price_is_compared_in_cents() {
    setup!(client, tx);
    seed(&tx).await;

    let filter = PropertyFilter::new().minimum_price_per_night(50);
    let found = properties::get_all_properties(&tx, &filter, None).await.unwrap();
    assert_eq!(costs(&found), vec![5_000, 8_000, 12_000]);
    assert!(found.iter().all(|l| l.property.cost_per_night >= 5_000));
}

#[tokio::test]
async fn city_match_is_case_insensitive_substring() {
    setup!(client, tx);
    let f = seed(&tx).await;

    let found = properties::get_all_properties(&tx, &PropertyFilter::new().city("vancouver"), None)
        .await
        .unwrap();
    let ids: Vec<i32> = found.iter().map(|l| l.property.id).collect();
    assert_eq!(ids, vec![f.cheap, f.pricey]);
}

#[tokio::test]
async fn owner_and_price_ceiling_combine() {
    setup!(client, tx);
    let f = seed(&tx).await;

    let filter = PropertyFilter::new()
        .owner_id(f.owner_a)
        .maximum_price_per_night(100);
    let found = properties::get_all_properties(&tx, &filter, None).await.unwrap();
    let ids: Vec<i32> = found.iter().map(|l| l.property.id).collect();
    assert_eq!(ids, vec![f.cheap, f.mid]);

    let other = PropertyFilter::new().owner_id(f.owner_b);
    let found = properties::get_all_properties(&tx, &other, None).await.unwrap();
    assert!(found.iter().all(|l| l.property.owner_id == f.owner_b));
}

#[tokio::test]
async fn reservations_exclude_today_and_past() {
    setup!(client, tx);
    let f = seed(&tx).await;
    let (guest, cheap, pricey, mid, exact_fifty, owner_b) =
        (f.guest, f.cheap, f.pricey, f.mid, f.exact_fifty, f.owner_b);

    tx.batch_execute(&format!(
        "INSERT INTO reservations (start_date, end_date, property_id, guest_id) VALUES
            (CURRENT_DATE + 10, CURRENT_DATE + 15, {mid}, {guest}),
            (CURRENT_DATE + 3, CURRENT_DATE + 5, {cheap}, {guest}),
            (CURRENT_DATE, CURRENT_DATE + 2, {exact_fifty}, {guest}),
            (CURRENT_DATE - 5, CURRENT_DATE - 1, {pricey}, {guest}),
            (CURRENT_DATE + 1, CURRENT_DATE + 2, {cheap}, {owner_b});"
    ))
    .await
    .unwrap();

    let upcoming = reservations::get_all_reservations(&tx, guest, None)
        .await
        .unwrap();
    let property_ids: Vec<i32> = upcoming.iter().map(|r| r.property.id).collect();
    assert_eq!(property_ids, vec![cheap, mid]);

    let today: chrono::NaiveDate = tx
        .query_one("SELECT CURRENT_DATE", &[])
        .await
        .unwrap()
        .get(0);
    assert!(upcoming.iter().all(|r| r.reservation.guest_id == guest));
    assert!(upcoming.iter().all(|r| r.reservation.start_date > today));
    assert_eq!(upcoming[0].average_rating, 4.5);

    let first_only = reservations::get_all_reservations(&tx, guest, Some(1))
        .await
        .unwrap();
    assert_eq!(first_only.len(), 1);
    assert_eq!(first_only[0].property.id, cheap);
}
