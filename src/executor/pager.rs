//! Paginator: one page per call
//!
//! Runs the fixed pipeline plan → fetch → assemble. Holds no state between
//! calls and borrows the store immutably, so one paginator can serve
//! concurrent requests.

use crate::config::PagerConfig;
use crate::observability::{log_event, Event};
use crate::planner::{ExplainPlan, PagePlanner, SearchRequest};

use super::assembler::PageAssembler;
use super::errors::{PageError, PageOutcome};
use super::executor::{PageExecutor, PageStore};
use super::result::PageResult;

/// Keyset paginator over a backing store
pub struct Paginator<'a, S: PageStore> {
    store: &'a S,
    planner: PagePlanner,
}

impl<'a, S: PageStore> Paginator<'a, S> {
    /// Creates a paginator with the default identity field and page limit
    pub fn new(store: &'a S) -> Self {
        Self::with_planner(store, PagePlanner::default())
    }

    pub fn with_planner(store: &'a S, planner: PagePlanner) -> Self {
        Self { store, planner }
    }

    /// Creates a paginator honoring the configured identity field and
    /// page sizes
    pub fn from_config(store: &'a S, config: &PagerConfig) -> Self {
        let planner = PagePlanner::new(&config.id_field, config.max_count)
            .with_default_count(config.default_count);
        Self::with_planner(store, planner)
    }

    pub fn planner(&self) -> &PagePlanner {
        &self.planner
    }

    /// Fetches one page.
    ///
    /// Contract violations are rejected before the store is called. Store
    /// errors are returned unchanged.
    pub fn page(&self, request: &SearchRequest) -> PageOutcome<PageResult> {
        let count = self.planner.count_for(request).to_string();
        let sort = request.sort.to_string();
        log_event(Event::PageBegin, &[("count", count.as_str()), ("sort", sort.as_str())]);

        let plan = match self.planner.plan(request) {
            Ok(plan) => plan,
            Err(err) => {
                log_event(
                    Event::PageRejected,
                    &[("code", err.code().code()), ("message", err.message())],
                );
                return Err(PageError::ContractViolation(err));
            }
        };

        let hint = plan.traversal.hint.to_string();
        let natural = plan.traversal.natural.to_string();
        log_event(Event::PagePlanned, &[("hint", hint.as_str()), ("natural", natural.as_str())]);

        let rows = match PageExecutor::new(self.store).fetch(request, &plan) {
            Ok(rows) => rows,
            Err(err) => {
                log_event(
                    Event::StoreError,
                    &[("code", err.code().code()), ("message", err.message())],
                );
                return Err(PageError::Store(err));
            }
        };

        let page = PageAssembler::assemble(rows, &plan, request);

        let records = page.len().to_string();
        log_event(
            Event::PageComplete,
            &[
                ("has_next", if page.has_next() { "true" } else { "false" }),
                ("has_previous", if page.has_previous() { "true" } else { "false" }),
                ("records", records.as_str()),
            ],
        );

        Ok(page)
    }

    /// Describes how a request would be walked, without touching the store
    pub fn explain(&self, request: &SearchRequest) -> ExplainPlan {
        match self.planner.plan(request) {
            Ok(plan) => ExplainPlan::from_plan(request, &plan),
            Err(err) => ExplainPlan::from_error(&err),
        }
    }
}
