//! TUI Widgets - Reusable UI components

mod alert;
mod dialog;
mod form;
mod header;
mod sprint_list;
mod stats;
mod status_bar;
mod story_list;
mod tab_bar;
mod terminal_frame;

pub use alert::{AlertBanner, AlertKind};
pub use dialog::DialogWidget;
pub use form::BacklogForm;
pub use header::Header;
pub use sprint_list::SprintList;
pub use stats::StatsGrid;
pub use status_bar::StatusBar;
pub use story_list::StoryList;
pub use tab_bar::TabBar;
pub use terminal_frame::TerminalFrame;
