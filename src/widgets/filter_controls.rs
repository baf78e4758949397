//! Filter panel controls widget

use egui::{ComboBox, Ui};

use crate::constants::sentinel::ALL;
use crate::state::{FilterSelection, FilterWidget};

/// Interaction produced by one frame of a filter control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Toggle(String),
    SelectAll(bool),
    Single(String),
}

/// Combo box for single-selects, checkbox list for multi-selects
pub struct FilterControls<'a> {
    widget: &'a FilterWidget,
}

impl<'a> FilterControls<'a> {
    pub fn new(widget: &'a FilterWidget) -> Self {
        Self { widget }
    }

    /// Show the control; the caller applies the returned action
    pub fn show(self, ui: &mut Ui) -> Option<FilterAction> {
        let widget = self.widget;
        ui.label(&widget.descriptor.label);

        match &widget.selection {
            FilterSelection::Single { options, value } => {
                let mut action = None;
                ComboBox::from_id_salt(widget.id())
                    .selected_text(widget.display_text())
                    .width(ui.available_width() - 8.0)
                    .show_ui(ui, |ui| {
                        if ui.selectable_label(value == ALL, widget.all_label()).clicked() {
                            action = Some(FilterAction::Single(ALL.to_string()));
                        }
                        for option in options {
                            if ui.selectable_label(value == option, option).clicked() {
                                action = Some(FilterAction::Single(option.clone()));
                            }
                        }
                    });
                action
            }
            FilterSelection::Multi { options, .. } => {
                let mut action = None;
                egui::CollapsingHeader::new(widget.display_text())
                    .id_salt(widget.id())
                    .default_open(true)
                    .show(ui, |ui| {
                        let mut all = widget.all_checked();
                        if ui.checkbox(&mut all, "Select all").changed() {
                            action = Some(FilterAction::SelectAll(all));
                        }
                        ui.separator();
                        egui::ScrollArea::vertical()
                            .id_salt(widget.id())
                            .max_height(180.0)
                            .show(ui, |ui| {
                                for option in options {
                                    let mut checked = widget.is_checked(option);
                                    if ui.checkbox(&mut checked, option).changed() {
                                        action = Some(FilterAction::Toggle(option.clone()));
                                    }
                                }
                            });
                    });
                action
            }
        }
    }
}
