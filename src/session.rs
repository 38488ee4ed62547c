//! Synchronous command dispatcher over the chart core.
//!
//! Filter-changing commands rebuild the whole frame: predicate, matching
//! items, domains, view points. Focus commands only look at the current
//! frame and never refetch.

use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, warn};

use crate::config::{ChartConfig, DomainSource, PerAxis};
use crate::declutter::{ProximityGrid, neighbors_within};
use crate::filter::{Clause, ClauseKey, FilterRegistry};
use crate::mapper::{CoordinateMapper, DomainMode, Domains, TooltipPlacement, place_tooltip};
use crate::model::{Axis, ItemId, ViewPoint};
use crate::repository::ItemRepository;

/// Gap between a point and its tooltip, in chart pixels.
pub const TOOLTIP_OFFSET: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetAxisLimit { axis: Axis, max: f64 },
    ToggleCategory(String),
    /// Text typed into the search box; refreshes suggestions only.
    SearchInput(String),
    /// Filters by the typed phrase.
    SubmitSearch(String),
    /// Narrows the chart down to one suggested item.
    PickSuggestion(ItemId),
    ClearSearch,
    FocusEntered(ItemId),
    FocusLeft,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Rebuilt,
    FocusChanged,
    SuggestionsChanged,
    Unchanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Normal,
    Focused,
    Dimmed,
}

#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub domains: Domains,
    pub points: Vec<ViewPoint>,
    pub revision: u64,
}

impl Frame {
    pub fn point(&self, id: &str) -> Option<&ViewPoint> {
        self.points.iter().find(|point| point.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusState {
    pub id: ItemId,
    pub dimmed: BTreeSet<ItemId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<ItemId>,
    pub picked: Option<ItemId>,
}

pub struct Session {
    repository: Arc<ItemRepository>,
    config: ChartConfig,
    registry: FilterRegistry,
    mapper: CoordinateMapper,
    limits: PerAxis<f64>,
    search: SearchState,
    frame: Frame,
    focus: Option<FocusState>,
}

impl Session {
    pub fn new(repository: Arc<ItemRepository>, config: ChartConfig) -> Self {
        let mut registry = FilterRegistry::with_policy(config.empty_or_group);
        for axis in Axis::ALL {
            registry.set(Clause::AxisAtMost {
                axis,
                max: config.initial_limits.get(axis),
            });
        }
        for category in &config.initial_categories {
            registry.set(Clause::CategoryIs(category.clone()));
        }

        let mut session = Self {
            repository,
            mapper: config.mapper(),
            limits: config.initial_limits,
            registry,
            config,
            search: SearchState::default(),
            frame: Frame::default(),
            focus: None,
        };
        session.rebuild();
        session
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        match command {
            Command::SetAxisLimit { axis, max } => {
                if !max.is_finite() {
                    warn!("event=limit_rejected axis={axis:?} max={max}");
                    return Outcome::Unchanged;
                }
                self.apply_limit(axis, max);
                self.rebuild()
            }
            Command::ToggleCategory(category) => {
                let key = ClauseKey::Category(category.clone());
                if self.registry.remove_clause(&key).is_none() {
                    self.registry.set(Clause::CategoryIs(category));
                }
                self.rebuild()
            }
            Command::SearchInput(text) => {
                let blank = text.trim().is_empty();
                self.search.query = text;
                if blank {
                    self.search.suggestions.clear();
                    self.search.picked = None;
                    self.registry.remove_clause(&ClauseKey::NameSearch);
                    return self.rebuild();
                }

                self.search.suggestions = self
                    .repository
                    .suggest(&self.search.query, self.config.suggestion_limit)
                    .iter()
                    .map(|item| item.id.clone())
                    .collect();
                Outcome::SuggestionsChanged
            }
            Command::SubmitSearch(text) => {
                let phrase = text.trim().to_owned();
                if phrase.is_empty() {
                    return self.dispatch(Command::ClearSearch);
                }

                self.registry.set(Clause::NameContains(phrase));
                self.search = SearchState {
                    query: text,
                    ..SearchState::default()
                };
                self.rebuild()
            }
            Command::PickSuggestion(id) => {
                let Some(item) = self.repository.get(&id).cloned() else {
                    warn!("event=suggestion_unknown id={id:?}");
                    return Outcome::Unchanged;
                };

                for axis in Axis::ALL {
                    self.apply_limit(axis, item.metric(axis).ceil());
                }
                self.registry.clear_categories();
                self.registry.set(Clause::CategoryIs(item.category.clone()));
                self.registry
                    .set(Clause::NameEquals(item.display_name.clone()));
                self.search = SearchState {
                    query: item.display_name.clone(),
                    suggestions: Vec::new(),
                    picked: Some(id),
                };
                self.rebuild()
            }
            Command::ClearSearch => {
                self.registry.remove_clause(&ClauseKey::NameSearch);
                self.search = SearchState::default();
                self.rebuild()
            }
            Command::FocusEntered(id) => {
                let Some(focus) = self.frame.point(&id) else {
                    return if self.focus.take().is_some() {
                        Outcome::FocusChanged
                    } else {
                        Outcome::Unchanged
                    };
                };

                let threshold = self.config.declutter_threshold;
                let dimmed = if self.frame.points.len() >= self.config.grid_min_points {
                    ProximityGrid::build(&self.frame.points, threshold).neighbors_of(focus)
                } else {
                    neighbors_within(focus, &self.frame.points, threshold)
                };

                let next = FocusState { id, dimmed };
                if self.focus.as_ref() == Some(&next) {
                    return Outcome::Unchanged;
                }
                debug!(
                    "event=focus_entered id={:?} dimmed={}",
                    next.id,
                    next.dimmed.len()
                );
                self.focus = Some(next);
                Outcome::FocusChanged
            }
            Command::FocusLeft => {
                if self.focus.take().is_some() {
                    Outcome::FocusChanged
                } else {
                    Outcome::Unchanged
                }
            }
        }
    }

    fn apply_limit(&mut self, axis: Axis, max: f64) {
        self.limits.set(axis, max);
        self.registry.set(Clause::AxisAtMost { axis, max });
        if self.config.domain_source == DomainSource::Limits {
            self.mapper.set_mode(axis, DomainMode::Fixed { max });
        }
    }

    fn rebuild(&mut self) -> Outcome {
        let predicate = self.registry.build_predicate();
        let items = self.repository.matching(|item| predicate.matches(item));
        let domains = self.mapper.compute_domains(&items);
        let points = self.mapper.view_points(&items, &domains);

        self.frame = Frame {
            domains,
            points,
            revision: self.frame.revision.wrapping_add(1),
        };
        self.focus = None;

        debug!(
            "event=frame_rebuilt revision={} visible={} clauses={}",
            self.frame.revision,
            self.frame.points.len(),
            self.registry.len()
        );
        Outcome::Rebuilt
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn focus(&self) -> Option<&FocusState> {
        self.focus.as_ref()
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    pub fn limit(&self, axis: Axis) -> f64 {
        self.limits.get(axis)
    }

    pub fn category_enabled(&self, category: &str) -> bool {
        self.registry
            .contains(&ClauseKey::Category(category.to_owned()))
    }

    pub fn emphasis(&self, id: &str) -> Emphasis {
        match &self.focus {
            Some(focus) if focus.id == id => Emphasis::Focused,
            Some(focus) if focus.dimmed.contains(id) => Emphasis::Dimmed,
            _ => Emphasis::Normal,
        }
    }

    pub fn opacity(&self, id: &str) -> f32 {
        let opacity = &self.config.opacity;
        match self.emphasis(id) {
            Emphasis::Normal => opacity.normal,
            Emphasis::Focused => opacity.focused,
            Emphasis::Dimmed => opacity.dimmed,
        }
    }

    pub fn scale(&self, id: &str) -> f32 {
        match self.emphasis(id) {
            Emphasis::Focused => self.config.focus_scale,
            Emphasis::Normal | Emphasis::Dimmed => 1.0,
        }
    }

    pub fn tooltip_for(&self, id: &str) -> Option<TooltipPlacement> {
        let (width, height) = self.config.tooltip_size;
        self.frame
            .point(id)
            .map(|point| place_tooltip(point, width, height, TOOLTIP_OFFSET))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;

    fn repository() -> Arc<ItemRepository> {
        let items = vec![
            Item::new("taipan", "Elapidae", "Inland taipan", 0.025, 44.0, 180.0),
            Item::new("krait", "Elapidae", "Many-banded krait", 0.09, 40.0, 110.0),
            Item::new("mamba", "Elapidae", "Black mamba", 0.32, 120.0, 250.0),
            Item::new("lancehead", "Viperidae", "Fer-de-lance", 2.8, 458.0, 250.0),
        ];
        Arc::new(ItemRepository::from_items(items).unwrap())
    }

    fn visible_ids(session: &Session) -> Vec<&str> {
        session.frame().points.iter().map(ViewPoint::id).collect()
    }

    #[test]
    fn starts_with_default_clauses() {
        let session = Session::new(repository(), ChartConfig::default());

        assert_eq!(session.registry().len(), 3);
        assert!(session.category_enabled("Elapidae"));
        assert_eq!(visible_ids(&session), vec!["taipan", "krait"]);
    }

    #[test]
    fn raising_limits_reveals_more_items() {
        let mut session = Session::new(repository(), ChartConfig::default());

        let outcome = session.dispatch(Command::SetAxisLimit {
            axis: Axis::MetricB,
            max: 200.0,
        });
        assert_eq!(outcome, Outcome::Rebuilt);
        assert_eq!(visible_ids(&session), vec!["taipan", "krait", "mamba"]);
        assert_eq!(session.frame().domains.metric_b.max, 220.0);
    }

    #[test]
    fn non_finite_limit_is_ignored() {
        let mut session = Session::new(repository(), ChartConfig::default());
        let revision = session.frame().revision;

        let outcome = session.dispatch(Command::SetAxisLimit {
            axis: Axis::MetricA,
            max: f64::NAN,
        });
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(session.frame().revision, revision);
    }

    #[test]
    fn toggling_last_category_empties_the_chart() {
        let mut session = Session::new(repository(), ChartConfig::default());

        session.dispatch(Command::ToggleCategory("Elapidae".to_owned()));
        assert!(session.frame().is_empty());

        session.dispatch(Command::ToggleCategory("Elapidae".to_owned()));
        assert_eq!(visible_ids(&session), vec!["taipan", "krait"]);
    }

    #[test]
    fn picking_a_suggestion_narrows_to_that_item() {
        let mut session = Session::new(repository(), ChartConfig::default());

        session.dispatch(Command::PickSuggestion("lancehead".to_owned()));

        assert_eq!(visible_ids(&session), vec!["lancehead"]);
        assert_eq!(session.limit(Axis::MetricA), 3.0);
        assert_eq!(session.limit(Axis::MetricB), 458.0);
        assert!(session.category_enabled("Viperidae"));
        assert!(!session.category_enabled("Elapidae"));
        assert_eq!(session.search().query, "Fer-de-lance");

        session.dispatch(Command::ClearSearch);
        assert!(session.search().picked.is_none());
        assert!(!session.registry().contains(&ClauseKey::NameSearch));
    }

    #[test]
    fn search_input_only_refreshes_suggestions() {
        let mut session = Session::new(repository(), ChartConfig::default());
        let revision = session.frame().revision;

        let outcome = session.dispatch(Command::SearchInput("mamba".to_owned()));
        assert_eq!(outcome, Outcome::SuggestionsChanged);
        assert_eq!(session.search().suggestions, vec!["mamba".to_owned()]);
        assert_eq!(session.frame().revision, revision);

        let outcome = session.dispatch(Command::SearchInput(String::new()));
        assert_eq!(outcome, Outcome::Rebuilt);
        assert!(session.search().suggestions.is_empty());
    }

    #[test]
    fn submitted_phrase_filters_by_name() {
        let mut session = Session::new(repository(), ChartConfig::default());

        session.dispatch(Command::SubmitSearch(" KRAIT ".to_owned()));
        assert_eq!(visible_ids(&session), vec!["krait"]);

        session.dispatch(Command::SubmitSearch("   ".to_owned()));
        assert_eq!(visible_ids(&session), vec!["taipan", "krait"]);
    }

    #[test]
    fn focus_dims_neighbors_and_leave_restores_everyone() {
        let mut session = Session::new(repository(), ChartConfig::default());
        let taipan = session.frame().point("taipan").unwrap().clone();
        let krait = session.frame().point("krait").unwrap().clone();
        assert!(taipan.distance_to(&krait) < 60.0);

        assert_eq!(
            session.dispatch(Command::FocusEntered("taipan".to_owned())),
            Outcome::FocusChanged
        );
        assert_eq!(session.emphasis("taipan"), Emphasis::Focused);
        assert_eq!(session.emphasis("krait"), Emphasis::Dimmed);
        assert_eq!(session.opacity("krait"), 0.1);
        assert_eq!(session.scale("taipan"), 1.2);

        assert_eq!(
            session.dispatch(Command::FocusEntered("taipan".to_owned())),
            Outcome::Unchanged
        );

        session.dispatch(Command::FocusEntered("krait".to_owned()));
        assert_eq!(session.emphasis("taipan"), Emphasis::Dimmed);
        assert_eq!(session.emphasis("krait"), Emphasis::Focused);

        assert_eq!(session.dispatch(Command::FocusLeft), Outcome::FocusChanged);
        assert_eq!(session.emphasis("taipan"), Emphasis::Normal);
        assert_eq!(session.emphasis("krait"), Emphasis::Normal);
        assert_eq!(session.dispatch(Command::FocusLeft), Outcome::Unchanged);
    }

    #[test]
    fn focus_on_hidden_item_is_ignored() {
        let mut session = Session::new(repository(), ChartConfig::default());
        assert_eq!(
            session.dispatch(Command::FocusEntered("lancehead".to_owned())),
            Outcome::Unchanged
        );
        assert!(session.focus().is_none());
    }

    #[test]
    fn rebuild_clears_focus() {
        let mut session = Session::new(repository(), ChartConfig::default());
        session.dispatch(Command::FocusEntered("taipan".to_owned()));

        session.dispatch(Command::ToggleCategory("Viperidae".to_owned()));
        assert!(session.focus().is_none());
        assert_eq!(session.opacity("krait"), 0.8);
    }
}
