//! This bench test annotates a large description document against a legend
//! with many entries.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use non_empty_string::NonEmptyString;
use patlint::{
    LegendEntry, LegendMap,
    annotate::{DocType, Options, annotate},
};

/// Component names of equal length, so none contains another.
const COMPONENTS: [&str; 8] = [
    "固定槽", "支撑架", "连接杆", "基底层", "防护罩", "驱动轮", "传动轴", "限位块",
];

fn build_legend() -> LegendMap {
    let mut legend = LegendMap::default();
    for (i, component) in COMPONENTS.iter().enumerate() {
        legend.push(LegendEntry::new(
            format!("{}", 100 + i).parse().unwrap(),
            NonEmptyString::new((*component).to_string()).unwrap(),
        ));
    }
    legend
}

fn build_text() -> String {
    let mut text = String::new();
    for i in 0..500 {
        let a = COMPONENTS[i % COMPONENTS.len()];
        let b = COMPONENTS[(i + 3) % COMPONENTS.len()];
        text.push_str(&format!("所述{a}通过螺栓与{b}固定连接，"));
    }
    text.push('。');
    text
}

fn annotate_description(c: &mut Criterion) {
    let legend = build_legend();
    let text = build_text();

    c.bench_function("annotate description", |b| {
        b.iter(|| {
            annotate(
                &text,
                &legend,
                DocType::Description,
                Options {
                    smart_spacing: true,
                    ..Options::default()
                },
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, annotate_description);
criterion_main!(benches);
