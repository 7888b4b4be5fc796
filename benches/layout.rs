use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pedigree_layout::config::PedigreeConfig;
use pedigree_layout::ir::{Family, Gender, PersonData, RelationNode, Spouse, parse_family};
use pedigree_layout::layout::compute_layout;
use std::hint::black_box;

fn person(name: String, gender: Gender) -> RelationNode {
    RelationNode::new(PersonData::new(name, gender))
}

/// A proband with `width` children and as many siblings, each sibling with
/// a family of its own, over `depth` generations of ancestors.
fn wide_family(width: usize, depth: usize) -> Family {
    let mut partner = Spouse::new(PersonData::new("Partner", Gender::Female));
    for i in 0..width {
        partner = partner.with_child(person(format!("Child {i}"), Gender::Male));
    }
    let mut family = Family::new(person("Me".into(), Gender::Male).with_spouse(partner));

    for (side, cohort) in [("L", &mut family.siblings1), ("R", &mut family.siblings2)] {
        for i in 0..width / 2 {
            let mut spouse =
                Spouse::new(PersonData::new(format!("In-law {side}{i}"), Gender::Female));
            for j in 0..2 {
                spouse = spouse.with_child(person(format!("Nephew {side}{i}.{j}"), Gender::Male));
            }
            cohort.push(person(format!("Brother {side}{i}"), Gender::Male).with_spouse(spouse));
        }
    }

    family.father = Some(Box::new(ancestry("F".into(), Gender::Male, depth)));
    family.mother = Some(Box::new(ancestry("M".into(), Gender::Female, depth)));
    family
}

fn ancestry(name: String, gender: Gender, depth: usize) -> RelationNode {
    let node = person(name.clone(), gender);
    if depth <= 1 {
        return node;
    }
    node.with_parents(
        Some(ancestry(format!("{name}F"), Gender::Male, depth - 1)),
        Some(ancestry(format!("{name}M"), Gender::Female, depth - 1)),
    )
}

fn fixture(name: &str) -> &'static str {
    match name {
        "basic" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/basic.json")),
        "twins" => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/twins.json")),
        "half_siblings" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/half_siblings.json"
        )),
        "half_siblings_nested" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/half_siblings_nested.json"
        )),
        "extended" => include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/extended.json5"
        )),
        _ => panic!("unknown fixture {name}"),
    }
}

const FIXTURES: [&str; 5] = [
    "basic",
    "twins",
    "half_siblings",
    "half_siblings_nested",
    "extended",
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for name in FIXTURES {
        let input = fixture(name);
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, data| {
            b.iter(|| {
                let family = parse_family(black_box(data)).expect("parse failed");
                black_box(family);
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = PedigreeConfig::default();
    for name in FIXTURES {
        let family = parse_family(fixture(name)).expect("parse failed");
        group.bench_with_input(BenchmarkId::from_parameter(name), &family, |b, data| {
            b.iter(|| {
                let layout = compute_layout(black_box(data), &config).expect("layout failed");
                black_box(layout);
            });
        });
    }
    group.finish();
}

fn bench_wide_families(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_wide");
    for (width, depth) in [(4, 2), (16, 3), (64, 5)] {
        let family = wide_family(width, depth);
        let config = PedigreeConfig::default().with_depth(depth as i32);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("w{width}_d{depth}")),
            &family,
            |b, data| {
                b.iter(|| {
                    let layout = compute_layout(black_box(data), &config).expect("layout failed");
                    black_box(layout);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_layout, bench_wide_families);
criterion_main!(benches);
