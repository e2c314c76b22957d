//! Benchmarks for eager association loading.
//!
//! Covers the CPU side of the default strategy over an engine that answers
//! from memory:
//! - Whitelist parsing
//! - Association resolution and constraint building
//! - Full loads of one record and of record collections

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;

use rivet_query::prelude::*;
use rivet_query::relations::associations_for;
use rivet_query::{Include, Row};

// ============================================================================
// Fixtures
// ============================================================================

struct MemoryEngine {
    wheels: Vec<Row>,
    owner: Row,
}

impl MemoryEngine {
    fn new() -> Self {
        Self {
            wheels: (1..=4)
                .map(|id| Row::new().with("id", id as i64).with("car_id", 1i64))
                .collect(),
            owner: Row::new().with("id", 7i64).with("name", "Ada"),
        }
    }
}

impl QueryEngine for MemoryEngine {
    fn query_many(&self, sql: &str, _params: &[FilterValue]) -> QueryResult<Vec<Row>> {
        if sql.contains("wheels") {
            Ok(self.wheels.clone())
        } else {
            Ok(vec![self.owner.clone()])
        }
    }
}

struct Wheel {
    id: i64,
}

impl Model for Wheel {
    const MODEL_NAME: &'static str = "Wheel";
    const TABLE_NAME: &'static str = "wheels";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "car_id"];
}

impl FromRow for Wheel {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self { id: row.get_i64("id")? })
    }
}

struct Person {
    name: String,
}

impl Model for Person {
    const MODEL_NAME: &'static str = "Person";
    const TABLE_NAME: &'static str = "people";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "name"];
}

impl FromRow for Person {
    fn from_row(row: &impl RowRef) -> Result<Self, RowError> {
        Ok(Self { name: row.get_string("name")? })
    }
}

#[derive(Default)]
struct Car {
    id: i64,
    owner_id: i64,
    wheels: Vec<Wheel>,
    owner: Option<Person>,
}

impl Model for Car {
    const MODEL_NAME: &'static str = "Car";
    const TABLE_NAME: &'static str = "cars";
    const PRIMARY_KEY: &'static [&'static str] = &["id"];
    const COLUMNS: &'static [&'static str] = &["id", "owner_id"];

    fn relations() -> Vec<RelationSpec> {
        vec![
            RelationSpec::one_to_many::<Wheel>("wheels").order_by(OrderByField::asc("id")),
            RelationSpec::many_to_one::<Person>("owner"),
        ]
    }

    fn value(&self, column: &str) -> Option<FilterValue> {
        match column {
            "id" => Some(self.id.into()),
            "owner_id" => Some(self.owner_id.into()),
            _ => None,
        }
    }

    fn relation_mut(&mut self, name: &str) -> Option<&mut dyn RelationSlot> {
        match name {
            "wheels" => Some(&mut self.wheels),
            "owner" => Some(&mut self.owner),
            _ => None,
        }
    }
}

fn cars(n: i64) -> Vec<Car> {
    (1..=n)
        .map(|id| Car {
            id,
            owner_id: 7,
            ..Default::default()
        })
        .collect()
}

fn connection() -> Connection {
    Connection::with_options(
        MemoryEngine::new(),
        ConnectionOptions::new()
            .database_type(DatabaseType::PostgreSQL)
            .eager_mode(EagerMode::Default),
    )
}

// ============================================================================
// Resolution Benchmarks
// ============================================================================

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("association_resolution");

    group.bench_function("parse_whitelist", |b| {
        b.iter(|| black_box(Include::parse(["wheels", "owner", "books.publisher.address"])))
    });

    group.bench_function("resolve_all_associations", |b| {
        let mut car = Car {
            id: 1,
            owner_id: 7,
            ..Default::default()
        };
        let include = Include::new();
        b.iter(|| black_box(associations_for(&mut car, &include)))
    });

    group.bench_function("build_constraints", |b| {
        let mut car = Car {
            id: 1,
            owner_id: 7,
            ..Default::default()
        };
        let associations = associations_for(&mut car, &Include::new()).unwrap();
        b.iter(|| {
            for association in &associations {
                black_box(association.constraint(&car).unwrap());
            }
        })
    });

    group.finish();
}

// ============================================================================
// Loading Benchmarks
// ============================================================================

fn bench_loading(c: &mut Criterion) {
    let conn = connection();
    let mut group = c.benchmark_group("eager_loading");

    group.bench_function("load_single_record", |b| {
        b.iter(|| {
            let mut car = Car {
                id: 1,
                owner_id: 7,
                ..Default::default()
            };
            conn.load_all(&mut car).unwrap();
            black_box(car.wheels.len() + car.owner.map_or(0, |p| p.name.len()))
        })
    });

    for size in [10i64, 100] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("load_collection", size), &size, |b, &size| {
            b.iter(|| {
                let mut cars = cars(size);
                conn.load(&mut cars, ["wheels"]).unwrap();
                black_box(cars.iter().flat_map(|c| &c.wheels).map(|w| w.id).sum::<i64>())
            })
        });
    }

    group.bench_function("cache_mode_stub", |b| {
        b.iter(|| {
            let mut cars = cars(100);
            conn.query()
                .eager(["wheels", "owner"])
                .set_eager_mode(EagerMode::Cache)
                .eager_load(&mut cars)
                .unwrap();
            black_box(cars.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_loading);
criterion_main!(benches);
