//! Watch face UI: widget tree, symbols, layouts and refresh scheduling

pub mod aksdark;
pub mod layout;
pub mod symbols;
pub mod task;
pub mod widget;

use task::TaskHandle;
use widget::Screen;

pub trait WatchFace {
    /// Clock face identifier stored in the settings while this face is shown
    const ID: u8;

    /// Handle of the recurring refresh task driving this face
    fn task(&self) -> TaskHandle;

    /// Bring the widgets in line with the current controller readings
    fn refresh(&mut self, screen: &mut Screen);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No room left for another widget
    ScreenFull,
    /// No free task slot
    SchedulerFull,
}
