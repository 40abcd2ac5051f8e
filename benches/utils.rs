//! 热路径基准测试：爬虫识别、短码生成与校验、预览页渲染

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use linkpeek::services::preview::{RedirectMode, render_preview};
use linkpeek::services::{CrawlerDetect, PatternCrawlerDetector};
use linkpeek::storage::LinkRecord;
use linkpeek::utils::url_validator::validate_url;
use linkpeek::utils::{generate_short_code, is_valid_short_code};

// ============== 爬虫识别 ==============

fn bench_crawler_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("crawler/is_crawler");
    let detector = PatternCrawlerDetector::default();

    let cases = [
        ("facebook", "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)"),
        ("linkedin", "LinkedInBot/1.0 (compatible; Mozilla/5.0; Apache-HttpClient +http://www.linkedin.com)"),
        ("chrome", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"),
        ("empty", ""),
    ];

    for (name, ua) in cases {
        group.bench_function(name, |b| {
            b.iter(|| detector.is_crawler(black_box(ua)));
        });
    }

    group.finish();
}

// ============== 短码 ==============

fn bench_generate_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_short_code");

    for length in [6usize, 12, 32] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| generate_short_code(black_box(length)));
        });
    }

    group.finish();
}

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid", |b| {
        b.iter(|| is_valid_short_code(black_box("abc123")));
    });
    group.bench_function("invalid", |b| {
        b.iter(|| is_valid_short_code(black_box("'; DROP TABLE--")));
    });
    let max_len_code = "a".repeat(64);
    group.bench_function("max_length", |b| {
        b.iter(|| is_valid_short_code(black_box(&max_len_code)));
    });

    group.finish();
}

// ============== URL 校验 ==============

fn bench_validate_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_url");

    group.bench_function("https", |b| {
        b.iter(|| validate_url(black_box("https://example.com/path?q=1")));
    });
    group.bench_function("javascript", |b| {
        b.iter(|| validate_url(black_box("javascript:alert(1)")));
    });

    group.finish();
}

// ============== 预览页 ==============

fn bench_render_preview(c: &mut Criterion) {
    let record = LinkRecord {
        short_code: "abc123".to_string(),
        original_url: "https://example.com/articles/42?utm_source=share".to_string(),
        description: Some("Demo Page".to_string()),
        thumbnail_url: Some("https://x/img.png".to_string()),
    };

    c.bench_function("preview/render_meta_refresh", |b| {
        b.iter(|| {
            render_preview(
                black_box(&record),
                "https://sho.rt/short/abc123",
                "Shared Link",
                RedirectMode::MetaRefresh,
            )
        });
    });
}

criterion_group!(
    benches,
    bench_crawler_detection,
    bench_generate_short_code,
    bench_is_valid_short_code,
    bench_validate_url,
    bench_render_preview,
);
criterion_main!(benches);
