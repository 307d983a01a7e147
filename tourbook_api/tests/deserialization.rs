use tourbook_api::types::{Blog, ExtractedTour, InstagramPost, ListPage, Locale, Response, Tour};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[test]
fn deserialize_tours_full() {
    let json = load_fixture("tours.json");
    let resp: ListPage<Tour> = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.returned_count(), 2);
    assert_eq!(resp.total, 14);

    let tour = &resp.items[0];
    assert_eq!(tour.id, 101);
    assert_eq!(tour.title.get(Locale::Ru), Some("Прогулка по старому Самарканду"));
    assert_eq!(tour.price.as_deref(), Some("150000"));
    assert_eq!(tour.sale_price, None);
    assert_eq!(tour.currency.as_deref(), Some("UZS"));
    assert_eq!(tour.files.len(), 2);
    assert!(tour.files[1].is_main());
    assert_eq!(tour.status.as_deref(), Some("active"));
    assert_eq!(tour.rating, Some(4.8));
    assert_eq!(tour.reviews_count, Some(32));
    assert_eq!(tour.extra["duration"], "4 hours");
    assert_eq!(tour.extra["vendor"]["name"], "Silk Road Guides");
}

#[test]
fn deserialize_tours_lenient_fields() {
    let json = load_fixture("tours.json");
    let resp: ListPage<Tour> = serde_json::from_str(&json).unwrap();

    let tour = &resp.items[1];
    assert_eq!(tour.title.get(Locale::Uz), Some("Chimgan day hike"));
    assert_eq!(tour.price.as_deref(), Some("1250000000"));
    assert!(tour.files.is_empty());
    assert_eq!(tour.currency, None);
    assert_eq!(tour.rating, Some(4.5));
    assert_eq!(tour.reviews_count, Some(7));
    assert_eq!(tour.created_at, None);
}

#[test]
fn deserialize_tours_empty() {
    let json = load_fixture("tours_empty.json");
    let resp: ListPage<Tour> = serde_json::from_str(&json).unwrap();
    assert!(resp.is_empty());
    assert_eq!(resp.total, 0);
}

#[test]
fn deserialize_blogs_under_blogs_key() {
    let json = load_fixture("blogs.json");
    let resp: ListPage<Blog> = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.returned_count(), 2);
    assert_eq!(resp.total, 2);

    let first = &resp.items[0];
    assert_eq!(first.id, 7);
    assert_eq!(first.title.get(Locale::Uz), Some("Best time to visit Bukhara"));
    assert_eq!(first.views, Some(1204));
    assert_eq!(first.files[0].kind, None);

    let second = &resp.items[1];
    assert_eq!(second.image.as_deref(), Some("https://cdn.tourbook.uz/b/8.jpg"));
    assert_eq!(second.views, None);
}

#[test]
fn deserialize_blogs_under_data_key() {
    let json = r#"{"data": [{"id": 1, "title": "Hello"}], "total": 1}"#;
    let resp: ListPage<Blog> = serde_json::from_str(json).unwrap();
    assert_eq!(resp.items[0].id, 1);
}

#[test]
fn deserialize_null_list_as_empty_page() {
    let resp: ListPage<Tour> = serde_json::from_str(r#"{"data": null, "total": 0}"#).unwrap();
    assert!(resp.is_empty());
    assert_eq!(resp.total, 0);

    let resp: ListPage<Tour> = serde_json::from_str(r#"{"total": null}"#).unwrap();
    assert!(resp.is_empty());
    assert_eq!(resp.total, 0);
}

#[test]
fn deserialize_blogs_with_both_keys() {
    let json = r#"{"blogs": [{"id": 3, "title": "Khiva"}], "data": [], "total": 1}"#;
    let resp: ListPage<Blog> = serde_json::from_str(json).unwrap();
    assert_eq!(resp.returned_count(), 1);
    assert_eq!(resp.items[0].id, 3);
}

#[test]
fn deserialize_tour_detail_keeps_unknown_fields() {
    let json = load_fixture("tour_detail.json");
    let resp: Response<Tour> = serde_json::from_str(&json).unwrap();
    assert_eq!(resp.data.sale_price.as_deref(), Some("120000"));
    assert_eq!(resp.data.extra["route"][1]["title"], "Siab bazaar");

    let round_trip = serde_json::to_value(&resp.data).unwrap();
    assert_eq!(round_trip["route"][0]["title"], "Registan");
}

#[test]
fn deserialize_instagram_responses() {
    let post: Response<InstagramPost> =
        serde_json::from_str(&load_fixture("instagram_post.json")).unwrap();
    assert_eq!(post.data.shortcode.as_deref(), Some("C5xYz12AbCd"));
    assert_eq!(post.data.images.len(), 2);
    assert_eq!(post.data.extra["likes"], 412);

    let extracted: Response<ExtractedTour> =
        serde_json::from_str(&load_fixture("extracted_tour.json")).unwrap();
    assert_eq!(extracted.data.price.as_deref(), Some("900000"));
    assert_eq!(extracted.data.inclusions.len(), 3);
    assert_eq!(extracted.data.route[1].description.as_deref(), Some("Fortress of Alexander"));
}

#[test]
fn deserialize_malformed_json_returns_error() {
    let bad_json = r#"{"data": not valid json}"#;
    let result = serde_json::from_str::<ListPage<Tour>>(bad_json);
    assert!(result.is_err());
}

#[test]
fn deserialize_missing_id_returns_error() {
    let json = r#"{"data": [{"title": "No id"}], "total": 1}"#;
    let result = serde_json::from_str::<ListPage<Tour>>(json);
    assert!(result.is_err());
}
