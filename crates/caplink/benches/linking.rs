use caplink::{BBox, LinkOptions, MemoryPage, link_document};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

/// A page mixing prose columns, a ruled table, and two figure clusters.
fn synthetic_page() -> MemoryPage {
    let mut page = MemoryPage::new();
    for i in 0..12 {
        let top = 100.0 + 30.0 * i as f64;
        page.push_text_block(
            BBox::new(40.0, top, 280.0, top + 22.0),
            format!("paragraph line {i}"),
        );
    }
    page.push_text_block(BBox::new(320.0, 90.0, 560.0, 104.0), "Table 1.");
    for i in 0..6 {
        let top = 112.0 + 18.0 * i as f64;
        page.push_drawing(BBox::new(320.0, top, 560.0, top + 1.0));
    }
    page.push_text_block(BBox::new(320.0, 260.0, 420.0, 274.0), "Figure 1.");
    page.push_image(BBox::new(320.0, 280.0, 440.0, 380.0));
    page.push_image(BBox::new(445.0, 280.0, 560.0, 380.0));
    page.push_text_block(BBox::new(320.0, 420.0, 420.0, 434.0), "Figure 2.");
    page.push_image(BBox::new(320.0, 440.0, 560.0, 560.0));
    page
}

fn bench_link_document(c: &mut Criterion) {
    let options = LinkOptions::default();

    let single = vec![synthetic_page()];
    c.bench_function("link_single_page", |b| {
        b.iter(|| link_document(black_box(&single), black_box(&options)).unwrap())
    });

    let many = vec![synthetic_page(); 32];
    c.bench_function("link_32_pages", |b| {
        b.iter(|| link_document(black_box(&many), black_box(&options)).unwrap())
    });

    #[cfg(feature = "parallel")]
    c.bench_function("link_32_pages_parallel", |b| {
        use caplink::link_document_parallel;
        b.iter(|| link_document_parallel(black_box(&many), black_box(&options)).unwrap())
    });
}

criterion_group!(benches, bench_link_document);
criterion_main!(benches);
