use daisyworld::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
};
use tempfile::tempdir;

#[test]
fn engine_runs_hook_each_tick() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/lake.yaml")
        .expect("scenario should load");
    let (mut world, _) = scenario.build_world().expect("world should build");
    let temp = tempdir().expect("tempdir");
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: 0,
        snapshot_dir: temp.path().to_path_buf(),
    };
    let mut engine = EngineBuilder::new(settings, scenario.parameters.clone())
        .build()
        .expect("engine builds");

    let mut ticks = Vec::new();
    engine
        .run_with_hook(&mut world, 6, |snapshot| ticks.push(snapshot.tick))
        .expect("run succeeds");

    assert_eq!(ticks, vec![1, 2, 3, 4, 5, 6]);
    assert!(std::fs::read_dir(temp.path()).unwrap().next().is_none());
}
