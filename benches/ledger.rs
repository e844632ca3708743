use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use credit_ledger::{ActionType, Ledger, MemoryStore, RecordRequest};

/// Generates valid award requests for benchmarking.
///
/// Pattern per user (repeating):
/// 1. Enrollment 100 (referred by the previous user when one exists)
/// 2. Social post 40
/// 3. Coffee wall 25
///
/// Users are generated in order, so a referrer always has prior history by the
/// time they are referenced.
pub struct RequestGenerator {
    num_users: u32,
    requests_per_user: u32,
    with_referrals: bool,
    current_user: u32,
    current_step: u32,
}

impl RequestGenerator {
    pub fn new(num_users: u32, requests_per_user: u32, with_referrals: bool) -> Self {
        Self {
            num_users,
            requests_per_user,
            with_referrals,
            current_user: 1,
            current_step: 0,
        }
    }
}

impl Iterator for RequestGenerator {
    type Item = RecordRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_user > self.num_users {
            return None;
        }

        let user = format!("user{}", self.current_user);
        let req = match self.current_step % 3 {
            0 => {
                let req = RecordRequest::new(user, ActionType::Enrollment, 100);
                if self.with_referrals && self.current_user > 1 {
                    req.with_referrer(format!("user{}", self.current_user - 1))
                } else {
                    req
                }
            }
            1 => RecordRequest::new(user, ActionType::SocialPost, 40),
            _ => RecordRequest::new(user, ActionType::CoffeeWall, 25),
        };

        self.current_step += 1;
        if self.current_step >= self.requests_per_user {
            self.current_step = 0;
            self.current_user += 1;
        }

        Some(req)
    }
}

fn populated_ledger(num_users: u32, requests_per_user: u32) -> Ledger<MemoryStore> {
    let mut ledger = Ledger::new(MemoryStore::new());
    for req in RequestGenerator::new(num_users, requests_per_user, true) {
        let _ = ledger.record(req);
    }
    ledger
}

fn bench_record_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    for count in [1_000u32, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter(|| {
                let mut ledger = Ledger::new(MemoryStore::new());
                for req in RequestGenerator::new(1, count, false) {
                    let _ = black_box(ledger.record(req));
                }
                ledger
            });
        });
    }

    group.finish();
}

fn bench_record_with_referrals(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_with_referrals");

    for (users, per_user) in [(100u32, 100u32), (1_000, 10)] {
        let label = format!("{}u_{}req", users, per_user);
        group.bench_with_input(
            BenchmarkId::from_parameter(&label),
            &(users, per_user),
            |b, &(users, per_user)| {
                b.iter(|| {
                    let mut ledger = Ledger::new(MemoryStore::new());
                    for req in RequestGenerator::new(users, per_user, true) {
                        let _ = black_box(ledger.record(req));
                    }
                    ledger
                });
            },
        );
    }

    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");

    let ledger = populated_ledger(1_000, 10);

    group.bench_function("user_summary", |b| {
        b.iter(|| black_box(ledger.user_summary("user500").unwrap()));
    });

    group.bench_function("referral_summary", |b| {
        b.iter(|| black_box(ledger.referral_summary("user500").unwrap()));
    });

    group.bench_function("system_stats", |b| {
        b.iter(|| black_box(ledger.system_stats().unwrap()));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_record_only,
    bench_record_with_referrals,
    bench_reads
);

criterion_main!(benches);
