//! UI event dispatch.
//!
//! The page reports every control change as a [`UiEvent`]. [`dispatch`] maps
//! `(current selection, event)` to the next selection and [`render`] turns a
//! selection into everything the page displays. Both are pure, so the HTTP
//! layer can stay stateless: each browser session keeps its own selection and
//! sends it along with the event.
//!
//! Events that reference something the dataset does not know (an axis key,
//! a filter value, a reading index) are ignored and the previous selection is
//! kept, so the page keeps showing its last valid figure.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{AxisSlot, Filter, FilterKind, Selection, ViewPreset};
use crate::services::{
    axis_explanation, build_figure, reading_details, AxisExplanation, Dataset, Figure,
    FigureRequest, ReadingDetails,
};

/// A control change reported by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    /// An axis dropdown changed
    AxisChanged {
        /// Which axis
        slot: AxisSlot,
        /// New axis key
        key: String,
    },
    /// A filter dropdown changed
    FilterChanged {
        /// Which filter
        filter: FilterKind,
        /// New value (`"all"` clears the filter)
        value: Filter,
    },
    /// A view button was pressed
    ViewPresetSelected {
        /// Chosen preset
        preset: ViewPreset,
    },
    /// A point in the chart was clicked
    PointClicked {
        /// Index of the clicked reading
        reading: usize,
    },
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event was valid; this is the new selection
    Applied(Selection),
    /// The event was rejected; the selection is unchanged
    Ignored {
        /// The unchanged selection
        selection: Selection,
        /// Why the event was rejected
        reason: String,
    },
}

impl Transition {
    /// The selection after the event.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        match self {
            Self::Applied(selection) | Self::Ignored { selection, .. } => selection,
        }
    }

    /// Consumes the transition, returning the selection after the event.
    #[must_use]
    pub fn into_selection(self) -> Selection {
        match self {
            Self::Applied(selection) | Self::Ignored { selection, .. } => selection,
        }
    }

    /// Returns true if the event changed the selection state.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Everything the page shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    /// The scatter figure
    pub figure: Figure,
    /// Cards for the X, Y and Z axes
    pub explanation: Vec<AxisExplanation>,
    /// Details of the clicked reading, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ReadingDetails>,
}

/// Selection a new session starts with: default axes, no filters, 3D view.
#[must_use]
pub fn initial_selection(dataset: &Dataset) -> Selection {
    Selection::new(dataset.default_axes().clone())
}

/// Applies `event` to `current`.
pub fn dispatch(dataset: &Dataset, current: &Selection, event: UiEvent) -> Transition {
    debug!("Dispatching {:?}", event);

    let mut next = current.clone();
    let rejection = match event {
        UiEvent::AxisChanged { slot, key } => {
            if dataset.axis(&key).is_some() {
                next.axes.set(slot, key);
                None
            } else {
                Some(format!("Unknown axis '{key}'"))
            }
        }
        UiEvent::FilterChanged { filter, value } => {
            if is_known_filter_value(dataset, filter, &value) {
                next.filters.set(filter, value);
                None
            } else {
                Some(format!("Unknown {filter:?} filter value '{value}'"))
            }
        }
        UiEvent::ViewPresetSelected { preset } => {
            next.view = preset;
            next.camera_revision = current.camera_revision.wrapping_add(1);
            None
        }
        UiEvent::PointClicked { reading } => {
            if dataset.reading(reading).is_some() {
                next.selected = Some(reading);
                None
            } else {
                Some(format!("No reading at index {reading}"))
            }
        }
    };

    match rejection {
        None => Transition::Applied(next),
        Some(reason) => {
            warn!("Ignoring UI event: {}", reason);
            Transition::Ignored {
                selection: current.clone(),
                reason,
            }
        }
    }
}

/// Checks that a selection only references data the dataset knows.
pub fn validate_selection(dataset: &Dataset, selection: &Selection) -> Result<()> {
    for (slot, key) in selection.axes.iter() {
        if dataset.axis(key).is_none() {
            anyhow::bail!("Unknown {} axis '{}'", slot.label(), key);
        }
    }

    for kind in [FilterKind::Section, FilterKind::Category, FilterKind::Author] {
        let filter = selection.filters.get(kind);
        if !is_known_filter_value(dataset, kind, filter) {
            anyhow::bail!("Unknown {:?} filter value '{}'", kind, filter);
        }
    }

    if let Some(index) = selection.selected {
        dataset
            .reading(index)
            .with_context(|| format!("No reading at index {index}"))?;
    }

    Ok(())
}

/// Renders the figure and panels for `selection`.
pub fn render(dataset: &Dataset, selection: &Selection) -> Result<Screen> {
    let figure = build_figure(dataset, &FigureRequest::from(selection))?;
    let explanation = axis_explanation(dataset, &selection.axes)?;
    let details = selection
        .selected
        .map(|index| reading_details(dataset, index, &selection.axes))
        .transpose()?;

    Ok(Screen {
        figure,
        explanation,
        details,
    })
}

fn is_known_filter_value(dataset: &Dataset, kind: FilterKind, value: &Filter) -> bool {
    let Filter::Only(value) = value else {
        return true;
    };
    let known = match kind {
        FilterKind::Section => dataset.sections(),
        FilterKind::Category => dataset.categories(),
        FilterKind::Author => dataset.authors(),
    };
    known.iter().any(|v| v == value)
}

/// A single UI session that owns its selection and last rendered screen.
///
/// Used where the controller runs in-process; the HTTP layer uses the free
/// functions instead and lets the page hold the selection.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    dataset: &'a Dataset,
    selection: Selection,
    screen: Screen,
}

impl<'a> Session<'a> {
    /// Starts a session on the dataset defaults.
    pub fn new(dataset: &'a Dataset) -> Result<Self> {
        let selection = initial_selection(dataset);
        let screen = render(dataset, &selection).context("Failed to render initial screen")?;
        Ok(Self {
            dataset,
            selection,
            screen,
        })
    }

    /// Handles one event. Returns true if the screen was recomputed.
    ///
    /// Rejected events, and selections that fail to render, leave the
    /// previous selection and screen in place.
    pub fn handle(&mut self, event: UiEvent) -> bool {
        let transition = dispatch(self.dataset, &self.selection, event);
        if !transition.is_applied() {
            return false;
        }

        let selection = transition.into_selection();
        match render(self.dataset, &selection) {
            Ok(screen) => {
                self.selection = selection;
                self.screen = screen;
                true
            }
            Err(e) => {
                warn!("Keeping previous screen: {:#}", e);
                false
            }
        }
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Last successfully rendered screen.
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }
}
