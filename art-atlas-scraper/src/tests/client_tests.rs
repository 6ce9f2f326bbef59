use super::*;

fn client() -> WikipediaClient {
    let settings = HttpSettings {
        api_base: "https://en.wikipedia.org/".to_string(),
        ..Default::default()
    };
    WikipediaClient::new(&settings).unwrap()
}

#[test]
fn test_encode_title() {
    assert_eq!(encode_title("Mona Lisa"), "Mona_Lisa");
    assert_eq!(
        encode_title("The Garden of Earthly Delights"),
        "The_Garden_of_Earthly_Delights"
    );
    assert_eq!(encode_title("Las Meninas (Picasso)"), "Las_Meninas_%28Picasso%29");
    assert_eq!(encode_title("AC/DC"), "AC%2FDC");
    assert_eq!(encode_title("Guernica "), "Guernica");
}

#[test]
fn test_article_url() {
    assert_eq!(
        article_url(DEFAULT_PAGE_BASE, "The Night Watch"),
        "https://en.wikipedia.org/wiki/The_Night_Watch"
    );
    assert_eq!(
        article_url("https://de.wikipedia.org/wiki/", "Der Kuss"),
        "https://de.wikipedia.org/wiki/Der_Kuss"
    );
}

#[test]
fn test_endpoint_urls() {
    let client = client();
    assert_eq!(
        client.rest_url("summary", "Mona Lisa"),
        "https://en.wikipedia.org/api/rest_v1/page/summary/Mona_Lisa"
    );
    assert_eq!(
        client.rest_url("html", "Mona Lisa"),
        "https://en.wikipedia.org/api/rest_v1/page/html/Mona_Lisa"
    );
    assert_eq!(client.action_url(), "https://en.wikipedia.org/w/api.php");
}

#[test]
fn test_http_settings_defaults() {
    let settings = HttpSettings::default();
    assert_eq!(settings.timeout(), Duration::from_secs(15));
    assert_eq!(settings.request_delay(), Duration::from_millis(500));
    assert_eq!(settings.max_download_bytes, 64 * 1024 * 1024);
    assert!(settings.user_agent.starts_with("art-atlas/"));
}

#[test]
fn test_http_settings_partial_json_uses_defaults() {
    let settings: HttpSettings = serde_json::from_str(r#"{"request_delay_ms": 0}"#).unwrap();
    assert_eq!(settings.request_delay_ms, 0);
    assert_eq!(settings.timeout_secs, 15);
    assert_eq!(settings.api_base, DEFAULT_API_BASE);
}

#[test]
fn test_check_status() {
    assert!(check_status(StatusCode::OK, "u").unwrap());
    assert!(!check_status(StatusCode::NOT_FOUND, "u").unwrap());
    assert!(matches!(
        check_status(StatusCode::TOO_MANY_REQUESTS, "u"),
        Err(ScrapeError::RateLimit)
    ));
    assert!(matches!(
        check_status(StatusCode::BAD_GATEWAY, "u"),
        Err(ScrapeError::ServerError { status: 502, .. })
    ));
}

#[test]
fn test_parse_summary() {
    let summary: PageSummary = serde_json::from_str(
        r#"{
            "type": "standard",
            "title": "Mona Lisa",
            "extract": "The Mona Lisa is a half-length portrait painting.",
            "thumbnail": {
                "source": "https://upload.wikimedia.org/wikipedia/commons/thumb/e/ec/Mona_Lisa.jpg/330px-Mona_Lisa.jpg",
                "width": 330,
                "height": 492
            },
            "originalimage": {
                "source": "https://upload.wikimedia.org/wikipedia/commons/e/ec/Mona_Lisa.jpg",
                "width": 7479,
                "height": 11146
            }
        }"#,
    )
    .unwrap();
    assert_eq!(summary.title.as_deref(), Some("Mona Lisa"));
    assert_eq!(summary.thumbnail.unwrap().width, Some(330));
    assert!(summary.originalimage.unwrap().source.ends_with("/e/ec/Mona_Lisa.jpg"));
}

#[test]
fn test_parse_pageimages_query() {
    let resp: QueryResponse = serde_json::from_str(
        r#"{
            "batchcomplete": true,
            "query": {
                "pages": [{
                    "pageid": 70889,
                    "ns": 0,
                    "title": "Mona Lisa",
                    "original": {
                        "source": "https://upload.wikimedia.org/wikipedia/commons/e/ec/Mona_Lisa.jpg",
                        "width": 7479,
                        "height": 11146
                    }
                }]
            }
        }"#,
    )
    .unwrap();
    let image = resp.first_page().unwrap().structured_image();
    assert_eq!(
        image.original.as_deref(),
        Some("https://upload.wikimedia.org/wikipedia/commons/e/ec/Mona_Lisa.jpg")
    );
    assert_eq!(image.thumbnail, None);
}

#[test]
fn test_parse_missing_page() {
    let resp: QueryResponse = serde_json::from_str(
        r#"{"query": {"pages": [{"ns": 0, "title": "No Such Painting", "missing": true}]}}"#,
    )
    .unwrap();
    assert!(resp.first_page().is_none());
}

#[test]
fn test_parse_revisions_and_search() {
    let resp: QueryResponse = serde_json::from_str(
        r#"{
            "query": {
                "pages": [{
                    "title": "The Starry Night",
                    "revisions": [{"slots": {"main": {"contentmodel": "wikitext", "content": "{{Infobox artwork\n| museum = [[Museum of Modern Art]]\n}}"}}}]
                }],
                "search": [{"ns": 0, "title": "The Starry Night", "pageid": 1}]
            }
        }"#,
    )
    .unwrap();
    assert!(resp.first_page().unwrap().wikitext().unwrap().contains("museum"));
    assert_eq!(resp.first_search_title(), Some("The Starry Night"));

    let empty: QueryResponse = serde_json::from_str(r#"{"batchcomplete": true}"#).unwrap();
    assert_eq!(empty.first_search_title(), None);
}
