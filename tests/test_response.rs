use frost::http::response::{Response, ResponseBuilder, StatusCode, escape_html};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::MovedPermanently.as_u16(), 301);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::TooManyRequests.as_u16(), 429);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::MovedPermanently.reason_phrase(), "Moved Permanently");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(StatusCode::TooManyRequests.reason_phrase(), "Too Many Requests");
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    assert_eq!(response.header("Content-Length"), Some("16"));
}

#[test]
fn test_response_builder_replaces_custom_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    let lengths: Vec<_> = response
        .headers
        .iter()
        .filter(|(k, _)| k == "Content-Length")
        .collect();
    assert_eq!(lengths.len(), 1);
    assert_eq!(response.header("Content-Length"), Some("4"));
}

#[test]
fn test_response_builder_adds_connection_close() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert_eq!(response.header("Connection"), Some("close"));
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[test]
fn test_response_builder_keeps_header_order_and_duplicates() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/plain")
        .header("X-Trace", "one")
        .header("X-Trace", "two")
        .body(b"x".to_vec())
        .build();

    let names: Vec<&str> = response.headers.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        names,
        vec!["Content-Type", "X-Trace", "X-Trace", "Content-Length", "Connection"]
    );
    assert_eq!(response.header("X-Trace"), Some("one"));
}

#[test]
fn test_header_lookup_is_case_insensitive() {
    let response = Response::ok("text/plain", "hi");
    assert_eq!(response.header("content-type"), Some("text/plain"));
    assert_eq!(response.header("CONNECTION"), Some("close"));
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok("image/png", vec![0x89, b'P', b'N', b'G']);

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Type"), Some("image/png"));
    assert_eq!(response.header("Content-Length"), Some("4"));
}

#[test]
fn test_moved_permanently_sets_location() {
    let response = Response::moved_permanently("/sub/");

    assert_eq!(response.status, StatusCode::MovedPermanently);
    assert_eq!(response.header("Location"), Some("/sub/"));
    assert!(String::from_utf8_lossy(&response.body).contains("href=\"/sub/\""));
}

#[test]
fn test_method_not_allowed_advertises_get() {
    let response = Response::method_not_allowed();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.header("Allow"), Some("GET"));
}

#[test]
fn test_too_many_requests_has_retry_hint() {
    let response = Response::too_many_requests();

    assert_eq!(response.status, StatusCode::TooManyRequests);
    assert_eq!(response.header("Retry-After"), Some("1"));
    assert_eq!(
        response.header("Content-Type"),
        Some("text/html; charset=utf-8")
    );
}

#[test]
fn test_not_found_is_always_the_same_page() {
    let a = Response::not_found();
    let b = Response::not_found();

    assert_eq!(a.status, StatusCode::NotFound);
    assert_eq!(a.body, b.body);
    assert_eq!(a.headers, b.headers);
}

#[test]
fn test_every_helper_has_required_headers() {
    let responses = vec![
        Response::ok("text/html; charset=utf-8", "x"),
        Response::moved_permanently("/a/"),
        Response::bad_request(),
        Response::not_found(),
        Response::method_not_allowed(),
        Response::too_many_requests(),
        Response::internal_error(),
    ];

    for response in responses {
        assert!(response.header("Content-Type").is_some());
        assert_eq!(
            response.header("Content-Length"),
            Some(response.body.len().to_string().as_str())
        );
        assert_eq!(response.header("Connection"), Some("close"));
    }
}

#[test]
fn test_escape_html() {
    assert_eq!(escape_html("<a href='x'>&\"</a>"), "&lt;a href=&#x27;x&#x27;&gt;&amp;&quot;&lt;/a&gt;");
    assert_eq!(escape_html("plain.html"), "plain.html");
}
