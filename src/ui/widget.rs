//! Retained widget tree
//!
//! The [`Screen`] owns every element shown on the display. Watch faces keep
//! [`WidgetId`]s and mutate elements in place; [`Screen::render`] then pushes
//! only what changed to the panel.

use core::fmt;

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use heapless::Vec;
use profont::PROFONT_24_POINT;

use super::{
    symbols::{self, Symbol},
    Error,
};

/// Maximum number of widgets on one screen
pub const MAX_WIDGETS: usize = 16;

/// Capacity of a label's text buffer in bytes
pub const LABEL_LEN: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Secondary text
    Small,
    /// Time of day
    Large,
}

impl Font {
    pub fn mono(self) -> &'static MonoFont<'static> {
        match self {
            Font::Small => &FONT_10X20,
            Font::Large => &PROFONT_24_POINT,
        }
    }
}

/// Fixed-capacity text of a label
#[derive(Clone, Copy)]
pub struct Label {
    str_buf: [u8; LABEL_LEN],
    len: usize,
}

impl Label {
    fn new() -> Self {
        Self {
            str_buf: [0; LABEL_LEN],
            len: 0,
        }
    }

    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.str_buf[..self.len]).unwrap_or("")
    }

    fn set_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        let mut str_buf = [0; LABEL_LEN];
        let len = format_no_std::show(&mut str_buf, args)?.len();
        self.str_buf = str_buf;
        self.len = len;
        Ok(())
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Label").field(&self.as_str()).finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Content {
    /// Filled rectangle of the given size
    Panel(Size),
    Text(Label),
    Symbol(Symbol),
    /// Battery gauge showing a charge percentage
    Battery(u8),
}

#[derive(Debug, Clone)]
pub struct Widget {
    content: Content,
    position: Point,
    font: Font,
    color: Rgb565,
    hidden: bool,
    /// Number of mutations applied since creation
    revision: u32,
    dirty: bool,
    /// Area covered the last time the widget was drawn
    drawn: Option<Rectangle>,
}

impl Widget {
    fn new(content: Content, position: Point, font: Font, color: Rgb565) -> Self {
        Self {
            content,
            position,
            font,
            color,
            hidden: false,
            revision: 0,
            dirty: true,
            drawn: None,
        }
    }

    pub fn panel(top_left: Point, size: Size, color: Rgb565) -> Self {
        Self::new(Content::Panel(size), top_left, Font::Small, color)
    }

    pub fn label(position: Point, font: Font, color: Rgb565) -> Self {
        Self::new(Content::Text(Label::new()), position, font, color)
    }

    pub fn symbol(position: Point, symbol: Symbol, color: Rgb565) -> Self {
        Self::new(Content::Symbol(symbol), position, Font::Small, color)
    }

    pub fn battery(position: Point, color: Rgb565) -> Self {
        Self::new(Content::Battery(0), position, Font::Small, color)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(label) => Some(label.as_str()),
            _ => None,
        }
    }

    pub fn symbol_kind(&self) -> Option<Symbol> {
        match self.content {
            Content::Symbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn battery_percent(&self) -> Option<u8> {
        match self.content {
            Content::Battery(percent) => Some(percent),
            _ => None,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn color(&self) -> Rgb565 {
        self.color
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    fn draw<D>(&self, target: &mut D) -> Result<Rectangle, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        match &self.content {
            Content::Panel(size) => {
                let area = Rectangle::new(self.position, *size);
                area.into_styled(PrimitiveStyle::with_fill(self.color)).draw(target)?;
                Ok(area)
            }
            Content::Text(label) => {
                let style = MonoTextStyle::new(self.font.mono(), self.color);
                let text =
                    Text::with_baseline(label.as_str(), self.position, style, Baseline::Middle);
                text.draw(target)?;
                Ok(text.bounding_box())
            }
            Content::Symbol(symbol) => symbol.draw(self.position, self.color, target),
            Content::Battery(percent) => {
                symbols::draw_battery(self.position, *percent, self.color, target)
            }
        }
    }
}

fn overlaps(a: &Rectangle, b: &Rectangle) -> bool {
    let common = a.intersection(b);
    common.size.width > 0 && common.size.height > 0
}

/// The widget tree of the active screen
pub struct Screen {
    size: Size,
    background: Rgb565,
    widgets: Vec<Widget, MAX_WIDGETS>,
    /// Mutations applied to existing widgets, including `clean`
    mutations: u32,
    full_redraw: bool,
}

impl Screen {
    pub fn new(size: Size, background: Rgb565) -> Self {
        Self {
            size,
            background,
            widgets: Vec::new(),
            mutations: 0,
            full_redraw: true,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn mutations(&self) -> u32 {
        self.mutations
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(id.0 as usize)
    }

    /// Whether the next `render` would draw anything
    pub fn needs_render(&self) -> bool {
        self.full_redraw || self.widgets.iter().any(|widget| widget.dirty)
    }

    /// Add a widget on top of the existing ones.
    pub fn create(&mut self, widget: Widget) -> Result<WidgetId, Error> {
        let id = WidgetId(self.widgets.len() as u8);
        self.widgets.push(widget).map_err(|_| Error::ScreenFull)?;
        Ok(id)
    }

    /// Remove every widget. Ids handed out before become dangling and are
    /// ignored by the setters.
    pub fn clean(&mut self) {
        self.widgets.clear();
        self.full_redraw = true;
        self.mutations += 1;
    }

    fn modify(&mut self, id: WidgetId, f: impl FnOnce(&mut Widget)) {
        match self.widgets.get_mut(id.0 as usize) {
            Some(widget) => {
                f(widget);
                widget.revision += 1;
                widget.dirty = true;
                self.mutations += 1;
            }
            None => warn!("Mutation of unknown widget {}", id.0),
        }
    }

    /// Replace a label's text with formatted output.
    ///
    /// Text that does not fit the label buffer is dropped and the previous
    /// text stays on screen.
    pub fn set_text_fmt(&mut self, id: WidgetId, args: fmt::Arguments<'_>) {
        let mut label = match self.widget(id).map(|widget| widget.content) {
            Some(Content::Text(label)) => label,
            _ => return,
        };
        if label.set_fmt(args).is_err() {
            warn!("Text of widget {} exceeds {} bytes", id.0, LABEL_LEN);
            return;
        }
        self.modify(id, |widget| widget.content = Content::Text(label));
    }

    pub fn set_text(&mut self, id: WidgetId, text: &str) {
        self.set_text_fmt(id, format_args!("{}", text));
    }

    pub fn set_symbol(&mut self, id: WidgetId, symbol: Symbol) {
        self.modify(id, |widget| widget.content = Content::Symbol(symbol));
    }

    pub fn set_battery_percent(&mut self, id: WidgetId, percent: u8) {
        self.modify(id, |widget| widget.content = Content::Battery(percent));
    }

    pub fn set_color(&mut self, id: WidgetId, color: Rgb565) {
        self.modify(id, |widget| widget.color = color);
    }

    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) {
        self.modify(id, |widget| widget.hidden = hidden);
    }

    /// Color visible behind `area`: the topmost visible panel below widget
    /// `index` that covers it, or the screen background.
    fn backdrop(&self, index: usize, area: &Rectangle) -> Rgb565 {
        self.widgets[..index]
            .iter()
            .rev()
            .filter(|widget| !widget.hidden)
            .find_map(|widget| match (widget.content, widget.drawn) {
                (Content::Panel(_), Some(drawn)) if drawn.intersection(area) == *area => {
                    Some(widget.color)
                }
                _ => None,
            })
            .unwrap_or(self.background)
    }

    /// Draw pending changes to `target`.
    ///
    /// The first call after creation or `clean` repaints everything. Later
    /// calls erase and redraw dirty widgets, plus any widget their old area
    /// overlapped.
    pub fn render<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if self.full_redraw {
            target.clear(self.background)?;
            for widget in self.widgets.iter_mut() {
                widget.drawn = if widget.hidden { None } else { Some(widget.draw(target)?) };
                widget.dirty = false;
            }
            self.full_redraw = false;
            return Ok(());
        }

        let mut erased: Vec<Rectangle, MAX_WIDGETS> = Vec::new();
        for (index, widget) in self.widgets.iter().enumerate() {
            if let (true, Some(area)) = (widget.dirty, widget.drawn) {
                target.fill_solid(&area, self.backdrop(index, &area))?;
                // One entry per widget at most
                let _ = erased.push(area);
            }
        }

        for widget in self.widgets.iter_mut() {
            let uncovered = match (widget.content, widget.drawn) {
                (Content::Panel(_), _) | (_, None) => false,
                (_, Some(area)) => erased.iter().any(|erased| overlaps(erased, &area)),
            };
            if widget.dirty || uncovered {
                widget.drawn = if widget.hidden { None } else { Some(widget.draw(target)?) };
                widget.dirty = false;
            }
        }

        Ok(())
    }
}
