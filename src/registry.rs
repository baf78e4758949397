//! Filter registry: which filters each chart declares, and their live state

use std::collections::{BTreeMap, BTreeSet};

use crate::config::{ChartConfig, EmptySelection, FilterDescriptor};
use crate::data::{DataStore, Field};
use crate::error::{DashError, Result};
use crate::pipeline::Constraint;
use crate::state::FilterWidget;

/// Invoked with the filter id after every effective interaction
pub type ChangeCallback = Box<dyn FnMut(&str)>;

pub struct FilterRegistry {
    descriptors: BTreeMap<String, Vec<FilterDescriptor>>,
    widgets: Vec<FilterWidget>,
    rendered_for: Option<String>,
    on_change: ChangeCallback,
}

impl FilterRegistry {
    pub fn new(charts: &[ChartConfig], on_change: impl FnMut(&str) + 'static) -> Self {
        let descriptors = charts
            .iter()
            .map(|c| (c.id.clone(), c.filters.clone()))
            .collect();
        Self {
            descriptors,
            widgets: Vec::new(),
            rendered_for: None,
            on_change: Box::new(on_change),
        }
    }

    /// Declared filters of a chart, in panel order
    pub fn filters_for(&self, chart_id: &str) -> &[FilterDescriptor] {
        self.descriptors
            .get(chart_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replace the current widgets with fresh ones for `chart_id`
    pub fn render(&mut self, chart_id: &str, store: &DataStore) {
        profiling::scope!("FilterRegistry::render");

        let widgets: Vec<FilterWidget> = self
            .filters_for(chart_id)
            .iter()
            .map(|d| {
                let options = if store.is_loaded() {
                    store.unique_values(&d.dataset, &d.field).unwrap_or_else(|e| {
                        tracing::warn!(filter = %d.id, error = %e, "no options for filter");
                        Vec::new()
                    })
                } else {
                    Vec::new()
                };
                FilterWidget::new(d.clone(), options)
            })
            .collect();

        tracing::debug!(chart = chart_id, widgets = widgets.len(), "rendered filter panel");
        self.widgets = widgets;
        self.rendered_for = Some(chart_id.to_string());
    }

    /// Chart whose widgets are currently built
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn rendered_chart(&self) -> Option<&str> {
        self.rendered_for.as_deref()
    }

    pub fn widgets(&self) -> &[FilterWidget] {
        &self.widgets
    }

    pub fn widget(&self, filter_id: &str) -> Option<&FilterWidget> {
        self.widgets.iter().find(|w| w.id() == filter_id)
    }

    /// Selected values of a rendered filter; empty means no restriction
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn selected(&self, filter_id: &str) -> BTreeSet<String> {
        self.widget(filter_id)
            .map(FilterWidget::selected)
            .unwrap_or_default()
    }

    pub fn toggle_item(&mut self, filter_id: &str, item: &str) {
        self.interact(filter_id, |w| w.toggle_item(item));
    }

    pub fn set_select_all(&mut self, filter_id: &str, all: bool) {
        self.interact(filter_id, |w| w.set_select_all(all));
    }

    pub fn select_single(&mut self, filter_id: &str, value: &str) {
        self.interact(filter_id, |w| w.select_single(value));
    }

    fn interact(&mut self, filter_id: &str, f: impl FnOnce(&mut FilterWidget) -> bool) {
        let Some(widget) = self.widgets.iter_mut().find(|w| w.id() == filter_id) else {
            tracing::warn!(filter = filter_id, "interaction with filter that is not rendered");
            return;
        };
        if f(widget) {
            (self.on_change)(filter_id);
        }
    }

    /// Read access limited to one chart's declared filters
    pub fn scoped<'a>(&'a self, chart_id: &'a str, empty: EmptySelection) -> ScopedFilters<'a> {
        ScopedFilters {
            chart_id,
            declared: self.filters_for(chart_id),
            registry: self,
            empty,
        }
    }
}

/// Filter state as one chart may see it
pub struct ScopedFilters<'a> {
    chart_id: &'a str,
    declared: &'a [FilterDescriptor],
    registry: &'a FilterRegistry,
    empty: EmptySelection,
}

impl<'a> ScopedFilters<'a> {
    /// Constraint of one declared filter
    pub fn constraint(&self, filter_id: &str) -> Result<Constraint> {
        if !self.declared.iter().any(|d| d.id == filter_id) {
            return Err(DashError::UndeclaredFilter {
                chart: self.chart_id.to_string(),
                filter: filter_id.to_string(),
            });
        }
        Ok(self
            .registry
            .widget(filter_id)
            .map(|w| w.constraint(self.empty))
            .unwrap_or(Constraint::Any))
    }

    /// Constraints of every declared filter, keyed by field
    pub fn constraints(&self) -> Vec<(Field, Constraint)> {
        self.declared
            .iter()
            .filter_map(|d| match self.constraint(&d.id) {
                Ok(c) => Some((d.field.clone(), c)),
                Err(e) => {
                    tracing::error!(error = %e, "filter lookup failed");
                    None
                }
            })
            .collect()
    }
}
