use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uri_builder_tiny::{
    entity::{EntityEncoder, PercentEncoder},
    BaseUri, Uri, UriBuilder,
};
use url::Url;

criterion_group!(
    benches,
    bench_parse,
    bench_parse_url,
    bench_seed,
    bench_seed_from_base,
    bench_build,
    bench_build_raw,
    bench_build_url,
    bench_encode,
);
criterion_main!(benches);

const PARSE_CASE: &str = "https://user@example.com/search?q=%E6%B5%8B%E8%AF%95#fragment";
const SEED_CASE: &str = "https://java.example.com:8080/foo/bar?hoge=fuga&piyo=hogera#frag";
const ENCODE_CASE: &str = "te😃a 测1`~!@试#$%st^&+=";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse", |b| b.iter(|| Uri::parse(black_box(PARSE_CASE))));
}

fn bench_parse_url(c: &mut Criterion) {
    c.bench_function("parse_url", |b| {
        b.iter(|| Url::parse(black_box(PARSE_CASE)))
    });
}

fn bench_seed(c: &mut Criterion) {
    c.bench_function("seed", |b| {
        b.iter(|| UriBuilder::parse(black_box(SEED_CASE)))
    });
}

fn bench_seed_from_base(c: &mut Criterion) {
    let base = BaseUri::parse(SEED_CASE).unwrap();
    c.bench_function("seed_from_base", |b| b.iter(|| base.builder()));
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build", |b| {
        b.iter(|| {
            UriBuilder::new()
                .set_scheme("foo")
                .set_host("example.com")?
                .set_port(8042)
                .append_paths(["over", "there"])?
                .add_query_parameter("name", "ferret")?
                .set_fragment("nose")?
                .build()
        })
    });
}

fn bench_build_raw(c: &mut Criterion) {
    c.bench_function("build_raw", |b| {
        b.iter(|| {
            UriBuilder::new()
                .set_scheme("foo")
                .set_raw_host("example.com")?
                .set_port(8042)
                .append_raw_paths(["over", "there"])?
                .add_raw_query_parameter("name", "ferret")?
                .set_raw_fragment("nose")?
                .build()
        })
    });
}

fn bench_build_url(c: &mut Criterion) {
    c.bench_function("build_url", |b| {
        b.iter(|| {
            let mut url = Url::parse("foo://example.com:8042")?;
            url.path_segments_mut()
                .map_err(|()| url::ParseError::RelativeUrlWithoutBase)?
                .extend(["over", "there"]);
            url.query_pairs_mut().append_pair("name", "ferret");
            url.set_fragment(Some("nose"));
            Ok::<_, url::ParseError>(url)
        })
    });
}

fn bench_encode(c: &mut Criterion) {
    let enc = PercentEncoder::default();
    c.bench_function("encode", |b| b.iter(|| enc.encode(&black_box(ENCODE_CASE))));
}
