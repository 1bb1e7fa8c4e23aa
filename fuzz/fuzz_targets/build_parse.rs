#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use uri_builder_tiny::UriBuilder;

#[derive(Arbitrary, Debug)]
struct Components<'a> {
    host: &'a str,
    port: Option<u16>,
    paths: Vec<&'a str>,
    query: Vec<(&'a str, &'a str)>,
    fragment: &'a str,
    force_remove_trailing_slash: bool,
}

fn form_decode(s: &str) -> String {
    let mut buf = Vec::new();
    let mut bytes = s.bytes();
    while let Some(x) = bytes.next() {
        match x {
            b'+' => buf.push(b' '),
            b'%' => {
                let hex = [bytes.next().unwrap(), bytes.next().unwrap()];
                let hex = std::str::from_utf8(&hex).unwrap();
                buf.push(u8::from_str_radix(hex, 16).unwrap());
            }
            x => buf.push(x),
        }
    }
    String::from_utf8(buf).unwrap()
}

fuzz_target!(|c: Components<'_>| {
    let mut builder = UriBuilder::new();
    builder
        .set_scheme("http")
        .force_remove_trailing_slash(c.force_remove_trailing_slash);
    if !c.host.is_empty() {
        builder.set_host(c.host).unwrap();
    }
    if let Some(port) = c.port {
        builder.set_port(port.into());
    }
    builder
        .set_paths(&c.paths)
        .unwrap()
        .set_query_parameters(c.query.iter().copied())
        .unwrap()
        .set_fragment(c.fragment)
        .unwrap();

    // Encoded input always yields a valid URI.
    let u = builder.build().unwrap();
    assert_eq!(u.as_str(), builder.build_string());
    assert_eq!(u.scheme().unwrap().as_str(), "http");

    let segments: Vec<_> = c.paths.iter().copied().filter(|s| !s.is_empty()).collect();
    let decoded: Vec<_> = u
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(form_decode)
        .collect();
    // Without a host, the first segment is read back as the authority.
    if !matches!(c.host, "" | "/") {
        assert_eq!(decoded, segments);
    }

    if let Some(q) = u.query() {
        let keys: Vec<_> = q
            .split('&')
            .map(|t| t.split_once('=').unwrap().0)
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    let seeded = UriBuilder::from_uri(&u);
    assert_eq!(seeded.fragment(), builder.fragment());
    assert_eq!(seeded.port(), builder.port());
});
