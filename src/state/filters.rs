//! Filter widget models and their selections

use std::collections::BTreeSet;

use crate::config::{EmptySelection, FilterDefault, FilterDescriptor, FilterRole};
use crate::constants::sentinel::ALL;
use crate::data::Field;
use crate::pipeline::filter::Constraint;

/// Current selection of one widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSelection {
    /// Combo box; `value` is [`ALL`] or one of `options`
    Single { options: Vec<String>, value: String },
    /// Checkbox list with a "Select all" toggle
    Multi {
        options: Vec<String>,
        checked: BTreeSet<String>,
    },
}

/// One rendered filter: its descriptor plus the live selection
#[derive(Debug, Clone)]
pub struct FilterWidget {
    pub descriptor: FilterDescriptor,
    pub selection: FilterSelection,
}

impl FilterWidget {
    /// Build a widget with its default selection
    pub fn new(descriptor: FilterDescriptor, options: Vec<String>) -> Self {
        let selection = if descriptor.multiple {
            let checked = options.iter().cloned().collect();
            FilterSelection::Multi { options, checked }
        } else {
            let value = match descriptor.default {
                FilterDefault::All => None,
                FilterDefault::Min => options.first().cloned(),
                FilterDefault::Max => options.last().cloned(),
            }
            .unwrap_or_else(|| ALL.to_string());
            FilterSelection::Single { options, value }
        };
        Self {
            descriptor,
            selection,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn options(&self) -> &[String] {
        match &self.selection {
            FilterSelection::Single { options, .. } | FilterSelection::Multi { options, .. } => {
                options
            }
        }
    }

    /// Selected values; empty means no restriction
    pub fn selected(&self) -> BTreeSet<String> {
        match &self.selection {
            FilterSelection::Single { value, .. } if value == ALL => BTreeSet::new(),
            FilterSelection::Single { value, .. } => BTreeSet::from([value.clone()]),
            FilterSelection::Multi { checked, .. } => checked.clone(),
        }
    }

    /// Whether the "Select all" box shows as checked
    pub fn all_checked(&self) -> bool {
        match &self.selection {
            FilterSelection::Multi { options, checked } => {
                options.iter().all(|o| checked.contains(o))
            }
            FilterSelection::Single { value, .. } => value == ALL,
        }
    }

    pub fn is_checked(&self, item: &str) -> bool {
        match &self.selection {
            FilterSelection::Multi { checked, .. } => checked.contains(item),
            FilterSelection::Single { value, .. } => value == item,
        }
    }

    /// Flip one checkbox. Returns false if the item is not an option.
    pub fn toggle_item(&mut self, item: &str) -> bool {
        match &mut self.selection {
            FilterSelection::Multi { options, checked } => {
                if !options.iter().any(|o| o == item) {
                    return false;
                }
                if !checked.remove(item) {
                    checked.insert(item.to_string());
                }
                true
            }
            FilterSelection::Single { .. } => false,
        }
    }

    /// Check or uncheck every item
    pub fn set_select_all(&mut self, all: bool) -> bool {
        match &mut self.selection {
            FilterSelection::Multi { options, checked } => {
                *checked = if all {
                    options.iter().cloned().collect()
                } else {
                    BTreeSet::new()
                };
                true
            }
            FilterSelection::Single { .. } => false,
        }
    }

    /// Choose a combo box entry, [`ALL`] included
    pub fn select_single(&mut self, choice: &str) -> bool {
        match &mut self.selection {
            FilterSelection::Single { options, value } => {
                if choice != ALL && !options.iter().any(|o| o == choice) {
                    return false;
                }
                *value = choice.to_string();
                true
            }
            FilterSelection::Multi { .. } => false,
        }
    }

    /// Summary shown on a collapsed multi-select
    pub fn display_text(&self) -> String {
        match &self.selection {
            FilterSelection::Multi { options, checked } => {
                let n = options.iter().filter(|o| checked.contains(*o)).count();
                if n == 0 {
                    "None selected".to_string()
                } else if n == options.len() {
                    "All selected".to_string()
                } else {
                    format!("{} selected", n)
                }
            }
            FilterSelection::Single { value, .. } if value == ALL => self.all_label(),
            FilterSelection::Single { value, .. } => value.clone(),
        }
    }

    /// Label of the explicit "all" entry, e.g. "All Years" or "All Age Groups"
    pub fn all_label(&self) -> String {
        let noun = match &self.descriptor.field {
            Field::Year => "Years".to_string(),
            Field::Category(name) => {
                let words: Vec<String> = name
                    .split(['_', ' '])
                    .filter(|w| !w.is_empty())
                    .map(capitalize)
                    .collect();
                format!("{}s", words.join(" "))
            }
        };
        format!("All {}", noun)
    }

    /// Turn the selection into a record constraint
    pub fn constraint(&self, empty: EmptySelection) -> Constraint {
        match &self.selection {
            FilterSelection::Single { value, .. } if value == ALL => Constraint::Any,
            FilterSelection::Single { value, .. } => match self.descriptor.role {
                FilterRole::Membership => Constraint::OneOf(BTreeSet::from([value.clone()])),
                FilterRole::RangeStart => value
                    .parse()
                    .map(Constraint::YearFrom)
                    .unwrap_or(Constraint::Any),
                FilterRole::RangeEnd => value
                    .parse()
                    .map(Constraint::YearUntil)
                    .unwrap_or(Constraint::Any),
            },
            FilterSelection::Multi { checked, .. } if checked.is_empty() => match empty {
                EmptySelection::Unrestricted => Constraint::Any,
                EmptySelection::Nothing => Constraint::Nothing,
            },
            FilterSelection::Multi { .. } if self.all_checked() => Constraint::Any,
            FilterSelection::Multi { checked, .. } => Constraint::OneOf(checked.clone()),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(field: &str, multiple: bool) -> FilterDescriptor {
        FilterDescriptor {
            id: format!("{field}-filter"),
            label: "Filter".into(),
            field: field.into(),
            dataset: "d".into(),
            multiple,
            role: FilterRole::Membership,
            default: FilterDefault::All,
        }
    }

    fn methods() -> Vec<String> {
        vec!["Camera".into(), "Police".into(), "Radar".into()]
    }

    #[test]
    fn test_multi_defaults_to_all_checked() {
        let widget = FilterWidget::new(descriptor("method", true), methods());
        assert!(widget.all_checked());
        assert_eq!(widget.selected().len(), 3);
        assert_eq!(widget.display_text(), "All selected");
        assert_eq!(widget.constraint(EmptySelection::Unrestricted), Constraint::Any);
    }

    #[test]
    fn test_unchecking_one_clears_select_all() {
        let mut widget = FilterWidget::new(descriptor("method", true), methods());
        assert!(widget.toggle_item("Police"));
        assert!(!widget.all_checked());
        assert_eq!(widget.display_text(), "2 selected");
        assert_eq!(
            widget.constraint(EmptySelection::Unrestricted),
            Constraint::OneOf(BTreeSet::from(["Camera".to_string(), "Radar".to_string()]))
        );

        assert!(widget.toggle_item("Police"));
        assert!(widget.all_checked());
        assert!(!widget.toggle_item("Helicopter"));
    }

    #[test]
    fn test_select_none_follows_profile() {
        let mut widget = FilterWidget::new(descriptor("method", true), methods());
        widget.set_select_all(false);
        assert!(widget.selected().is_empty());
        assert_eq!(widget.display_text(), "None selected");
        assert_eq!(widget.constraint(EmptySelection::Unrestricted), Constraint::Any);
        assert_eq!(widget.constraint(EmptySelection::Nothing), Constraint::Nothing);

        widget.set_select_all(true);
        assert!(widget.all_checked());
    }

    #[test]
    fn test_single_select_all_sentinel() {
        let mut widget = FilterWidget::new(descriptor("year", false), vec!["2019".into(), "2020".into()]);
        assert!(widget.selected().is_empty());
        assert_eq!(widget.display_text(), "All Years");

        assert!(widget.select_single("2020"));
        assert_eq!(widget.selected(), BTreeSet::from(["2020".to_string()]));
        assert!(!widget.select_single("1999"));
        assert!(widget.select_single(ALL));
        assert!(widget.selected().is_empty());
    }

    #[test]
    fn test_range_defaults_and_constraints() {
        let years = vec!["2018".to_string(), "2019".into(), "2020".into()];
        let mut start = descriptor("year", false);
        start.role = FilterRole::RangeStart;
        start.default = FilterDefault::Min;
        let mut end = descriptor("year", false);
        end.role = FilterRole::RangeEnd;
        end.default = FilterDefault::Max;

        let start = FilterWidget::new(start, years.clone());
        let end = FilterWidget::new(end, years);
        assert_eq!(start.constraint(EmptySelection::Unrestricted), Constraint::YearFrom(2018));
        assert_eq!(end.constraint(EmptySelection::Unrestricted), Constraint::YearUntil(2020));
    }

    #[test]
    fn test_all_labels() {
        let w = |f: &str| FilterWidget::new(descriptor(f, false), vec![]).all_label();
        assert_eq!(w("method"), "All Methods");
        assert_eq!(w("age_group"), "All Age Groups");
        assert_eq!(w("jurisdiction"), "All Jurisdictions");
    }
}
