use criterion::{black_box, criterion_group, criterion_main, Criterion};

use league_core::config::LeagueConfig;
use league_core::data::TEAM_CATALOG;
use league_core::engine::probability::ChampionshipProjector;
use league_core::season::Season;

fn season_after(weeks: usize) -> Season {
    let teams = TEAM_CATALOG[..4].iter().map(|p| p.to_state()).collect();
    let mut season = match Season::new(teams, &LeagueConfig::default().with_seed(2024)) {
        Ok(season) => season,
        Err(err) => panic!("bench season: {}", err),
    };
    for _ in 0..weeks {
        season.advance_week();
    }
    season
}

fn bench_projection(c: &mut Criterion) {
    let early = season_after(2);
    let late = season_after(12);

    let mut group = c.benchmark_group("championship_projection");
    group.sample_size(20);

    group.bench_function("parallel_10k_week_3", |b| {
        let projector = ChampionshipProjector::new(10_000);
        b.iter(|| projector.project(black_box(early.view()), 7))
    });

    group.bench_function("sequential_10k_week_3", |b| {
        let projector = ChampionshipProjector::new(10_000).sequential();
        b.iter(|| projector.project(black_box(early.view()), 7))
    });

    group.bench_function("parallel_10k_week_13", |b| {
        let projector = ChampionshipProjector::new(10_000);
        b.iter(|| projector.project(black_box(late.view()), 7))
    });

    group.finish();
}

fn bench_full_season(c: &mut Criterion) {
    c.bench_function("simulate_full_season", |b| {
        b.iter(|| {
            let mut season = season_after(0);
            season.advance_to_end();
            black_box(season.champions())
        })
    });
}

criterion_group!(benches, bench_projection, bench_full_season);
criterion_main!(benches);
