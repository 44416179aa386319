use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;
use tagged_table::{HashTable, Key, KeyKind, Value, ValueKind};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn bench_insert_int(c: &mut Criterion) {
    c.bench_function("tagged_table_insert_int_10k", |b| {
        b.iter_batched(
            || HashTable::new(KeyKind::Int, ValueKind::Int).unwrap(),
            |mut t| {
                for (i, x) in lcg(1).take(10_000).enumerate() {
                    t.insert(Key::Int(x as i64), Value::Int(i as i64)).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_insert_string(c: &mut Criterion) {
    c.bench_function("tagged_table_insert_string_10k", |b| {
        let keys: Vec<String> = lcg(3).take(10_000).map(|x| format!("k{x:016x}")).collect();
        b.iter_batched(
            || HashTable::new(KeyKind::Str, ValueKind::Uint).unwrap(),
            |mut t| {
                for (i, k) in keys.iter().enumerate() {
                    t.insert(Key::from(k.as_str()), Value::Uint(i as u64)).unwrap();
                }
                black_box(t)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("tagged_table_get_hit", |b| {
        let mut t = HashTable::new(KeyKind::Int, ValueKind::Int).unwrap();
        let keys: Vec<i64> = lcg(7).take(20_000).map(|x| x as i64).collect();
        for (i, &k) in keys.iter().enumerate() {
            t.insert(Key::Int(k), Value::Int(i as i64)).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = Key::Int(*it.next().unwrap());
            black_box(t.get(&k));
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("tagged_table_get_miss", |b| {
        let mut t = HashTable::new(KeyKind::Int, ValueKind::Int).unwrap();
        for (i, x) in lcg(11).take(10_000).enumerate() {
            t.insert(Key::Int(x as i64), Value::Int(i as i64)).unwrap();
        }
        let mut miss = lcg(0xdead_beef);
        b.iter(|| {
            // keys unlikely to be in the table
            let k = Key::Int(miss.next().unwrap() as i64);
            black_box(t.get(&k));
        })
    });
}

fn bench_config() -> Criterion {
    Criterion::default()
        .sample_size(50)
        .measurement_time(Duration::from_secs(8))
        .warm_up_time(Duration::from_secs(2))
}

criterion_group! {
    name = benches;
    config = bench_config();
    targets = bench_insert_int, bench_insert_string, bench_get_hit, bench_get_miss
}
criterion_main!(benches);
