use uri_builder_tiny::{BaseUri, Uri, UriBuilder};

#[test]
fn builder_from_base_string() {
    let base = BaseUri::parse("http://example.com").unwrap();

    let uri = base.builder().append_paths(["foo"]).unwrap().build().unwrap();
    assert_eq!(uri, "http://example.com/foo");

    let uri = base.builder().append_paths(["bar"]).unwrap().build().unwrap();
    assert_eq!(uri, "http://example.com/bar");
}

#[test]
fn builder_from_base_uri() {
    let base = BaseUri::from(Uri::parse("http://example.com").unwrap());

    let uri = base.builder().append_paths(["foo"]).unwrap().build().unwrap();
    assert_eq!(uri, "http://example.com/foo");

    let uri = base.builder().append_paths(["bar"]).unwrap().build().unwrap();
    assert_eq!(uri, "http://example.com/bar");

    let owned = BaseUri::from(Uri::parse(String::from("http://example.com")).unwrap());
    assert_eq!(owned, base);
}

#[test]
fn builders_are_independent() {
    let base: BaseUri = "https://example.com/api?v=1#top".parse().unwrap();

    let mut first = base.builder();
    first
        .append_paths(["users"])
        .unwrap()
        .add_query_parameter("page", 2)
        .unwrap()
        .set_port(8443);

    let second = base.builder();
    assert_eq!(second.paths(), ["", "api"]);
    assert_eq!(second.port(), None);
    assert_eq!(second.query_parameters().len(), 1);

    assert_eq!(
        first.build().unwrap(),
        "https://example.com:8443/api/users?page=2&v=1#top"
    );
    assert_eq!(second.build().unwrap(), "https://example.com/api?v=1#top");
}

#[test]
fn base_accessors() {
    let base = BaseUri::parse("http://user@example.com:8080/a?b=c").unwrap();
    assert_eq!(base.as_uri(), "http://user@example.com:8080/a?b=c");
    assert_eq!(base.as_uri().authority().unwrap().host(), "example.com");

    let builder = base.builder();
    assert_eq!(builder.scheme(), "http");
    assert_eq!(builder.host(), "example.com");
    assert_eq!(builder.port(), Some(8080));

    let direct = UriBuilder::parse("http://user@example.com:8080/a?b=c").unwrap();
    assert_eq!(direct.build().unwrap(), builder.build().unwrap());
}

#[test]
fn invalid_base() {
    let e = BaseUri::parse("http://exa mple.com").unwrap_err();
    assert_eq!(e.index(), 10);
    assert!("http://[::1".parse::<BaseUri>().is_err());
}
