use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use venom_atlas::{
    Axis, ChartConfig, ClauseKey, Command, Emphasis, Error, ItemRepository, Outcome, Session,
};

fn bundled_dataset() -> Arc<ItemRepository> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/snakes.csv");
    Arc::new(ItemRepository::load(path).unwrap())
}

fn visible(session: &Session) -> Vec<String> {
    session
        .frame()
        .points
        .iter()
        .map(|point| point.id().to_owned())
        .collect()
}

#[test]
fn bundled_dataset_loads_cleanly() {
    let repository = bundled_dataset();
    assert!(repository.len() > 40);
    assert!(repository.excluded().is_empty());
    assert!(repository.categories().contains("Atractaspididae"));
}

#[test]
fn initial_frame_shows_small_potent_elapids() {
    let repository = bundled_dataset();
    let expected = repository
        .all()
        .iter()
        .filter(|item| {
            item.category == "Elapidae" && item.metric_a <= 1.0 && item.metric_b <= 100.0
        })
        .map(|item| item.id.clone())
        .collect::<Vec<_>>();

    let session = Session::new(repository, ChartConfig::default());

    assert_eq!(visible(&session), expected);
    assert!(visible(&session).contains(&"Oxyuranus microlepidotus".to_owned()));
    assert!(!visible(&session).contains(&"Dendroaspis polylepis".to_owned()));
}

#[test]
fn search_pick_and_clear_round_trip() {
    let mut session = Session::new(bundled_dataset(), ChartConfig::default());

    assert_eq!(
        session.dispatch(Command::SearchInput("black mamba".to_owned())),
        Outcome::SuggestionsChanged
    );
    let first = session.search().suggestions.first().cloned().unwrap();
    assert_eq!(first, "Dendroaspis polylepis");

    assert_eq!(session.dispatch(Command::PickSuggestion(first)), Outcome::Rebuilt);
    assert_eq!(visible(&session), vec!["Dendroaspis polylepis".to_owned()]);
    assert_eq!(session.limit(Axis::MetricA), 1.0);
    assert_eq!(session.limit(Axis::MetricB), 120.0);
    assert_eq!(session.search().query, "Black mamba");

    session.dispatch(Command::ClearSearch);
    assert!(!session.registry().contains(&ClauseKey::NameSearch));
    assert!(visible(&session).len() > 1);
    assert!(visible(&session).contains(&"Dendroaspis polylepis".to_owned()));
}

#[test]
fn hover_cycle_restores_every_opacity() {
    let mut session = Session::new(bundled_dataset(), ChartConfig::default());
    let focus = visible(&session)[0].clone();

    session.dispatch(Command::FocusEntered(focus.clone()));
    let dimmed = session.focus().unwrap().dimmed.clone();
    assert!(!dimmed.contains(&focus));
    for id in &dimmed {
        assert_eq!(session.emphasis(id), Emphasis::Dimmed);
    }

    session.dispatch(Command::FocusLeft);
    for id in visible(&session) {
        assert_eq!(session.opacity(&id), 0.8);
        assert_eq!(session.scale(&id), 1.0);
    }
}

#[test]
fn json_dataset_excludes_bad_rows() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[
            {{"family": "Elapidae", "binomial": "Naja nivea", "commonName": "Cape cobra",
              "lethalDosage": "0.72", "yield": 120, "size": 160}},
            {{"family": "Elapidae", "binomial": "Naja haje", "commonName": "Egyptian cobra",
              "lethalDosage": null, "yield": 175, "size": 200}},
            {{"family": "Viperidae", "binomial": "", "commonName": "Nameless",
              "lethalDosage": 1, "yield": 1, "size": 1}}
        ]"#
    )
    .unwrap();

    let repository = ItemRepository::load(file.path()).unwrap();
    assert_eq!(repository.len(), 1);
    assert_eq!(repository.excluded().len(), 2);
    assert_eq!(repository.get("Naja nivea").unwrap().metric_a, 0.72);
}

#[test]
fn loader_rejects_unknown_extensions_and_duplicates() {
    let text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    assert!(matches!(
        ItemRepository::load(text.path()),
        Err(Error::UnsupportedFormat(_))
    ));

    let mut csv = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(csv, "family,binomial,commonName,lethalDosage,yield,size").unwrap();
    writeln!(csv, "Elapidae,Naja naja,Indian cobra,0.8,250,150").unwrap();
    writeln!(csv, "Elapidae,Naja naja,Spectacled cobra,0.8,250,150").unwrap();
    csv.flush().unwrap();

    assert!(matches!(
        ItemRepository::load(csv.path()),
        Err(Error::DuplicateId(id)) if id == "Naja naja"
    ));
}

#[test]
fn config_file_switches_to_data_driven_domains() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "domain_source": "data", "empty_or_group": "pass_all" }}"#).unwrap();
    let config = ChartConfig::load(file.path()).unwrap();

    let mut session = Session::new(bundled_dataset(), config);
    session.dispatch(Command::ToggleCategory("Elapidae".to_owned()));

    // With no family enabled every snake under both limits is shown.
    assert!(visible(&session)
        .iter()
        .any(|id| id == "Dispholidus typus"));
    let domain = session.frame().domains.get(Axis::MetricB);
    assert!(domain.max < 110.0);
}

#[test]
fn data_driven_domains_fall_back_when_nothing_matches() {
    let config = ChartConfig::from_json(r#"{ "domain_source": "data" }"#).unwrap();
    let mut session = Session::new(bundled_dataset(), config);
    assert!(!session.frame().is_empty());

    session.dispatch(Command::ToggleCategory("Elapidae".to_owned()));

    assert!(session.frame().is_empty());
    let domains = session.frame().domains;
    for (axis, lower) in [(Axis::MetricA, -0.1), (Axis::MetricB, -0.2)] {
        let domain = domains.get(axis);
        assert!(domain.min.is_finite() && domain.max.is_finite());
        assert_relative_eq!(domain.min, lower, epsilon = 1e-12);
        assert_relative_eq!(domain.max, 1.1, epsilon = 1e-12);
    }

    let ticks = session.mapper().vertical_scale(&domains).ticks(5);
    assert!(!ticks.is_empty());
    assert!(ticks.iter().all(|tick| tick.is_finite()));
}
