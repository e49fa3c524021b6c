//! Icon glyphs drawn with primitives
//!
//! Every symbol fits a 20x20 box whose left edge and vertical center sit on
//! the element's position.

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle, Rectangle},
};

pub const SYMBOL_SIZE: Size = Size::new(20, 20);

/// Number of fill levels the battery gauge can show
pub const BATTERY_LEVELS: u8 = 5;

const GAUGE_SIZE: Size = Size::new(22, 11);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    Bluetooth,
    Shoe,
    HeartBeat,
    Info,
    Check,
    Plug,
}

impl Symbol {
    /// Draw the symbol and return the area it covers.
    pub fn draw<D>(
        self,
        position: Point,
        color: Rgb565,
        target: &mut D,
    ) -> Result<Rectangle, D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let top_left = position - Point::new(0, SYMBOL_SIZE.height as i32 / 2);
        let area = Rectangle::new(top_left, SYMBOL_SIZE);
        let origin = area.top_left;
        let thin = PrimitiveStyle::with_stroke(color, 2);

        match self {
            Symbol::Bluetooth => {
                let points = [
                    Point::new(5, 5),
                    Point::new(15, 15),
                    Point::new(10, 19),
                    Point::new(10, 1),
                    Point::new(15, 5),
                    Point::new(5, 15),
                ];
                Polyline::new(&points).translate(origin).into_styled(thin).draw(target)?;
            }
            Symbol::Shoe => {
                let points = [
                    Point::new(3, 3),
                    Point::new(9, 3),
                    Point::new(9, 10),
                    Point::new(17, 13),
                    Point::new(17, 17),
                    Point::new(3, 17),
                    Point::new(3, 3),
                ];
                Polyline::new(&points).translate(origin).into_styled(thin).draw(target)?;
            }
            Symbol::HeartBeat => {
                let points = [
                    Point::new(0, 10),
                    Point::new(5, 10),
                    Point::new(8, 3),
                    Point::new(12, 17),
                    Point::new(15, 10),
                    Point::new(19, 10),
                ];
                Polyline::new(&points).translate(origin).into_styled(thin).draw(target)?;
            }
            Symbol::Info => {
                Circle::new(origin, 19).into_styled(thin).draw(target)?;
                Line::new(Point::new(9, 4), Point::new(9, 6))
                    .translate(origin)
                    .into_styled(thin)
                    .draw(target)?;
                Line::new(Point::new(9, 9), Point::new(9, 15))
                    .translate(origin)
                    .into_styled(thin)
                    .draw(target)?;
            }
            Symbol::Check => {
                let points = [Point::new(3, 10), Point::new(8, 15), Point::new(17, 4)];
                Polyline::new(&points)
                    .translate(origin)
                    .into_styled(PrimitiveStyle::with_stroke(color, 3))
                    .draw(target)?;
            }
            Symbol::Plug => {
                Rectangle::new(origin + Point::new(5, 6), Size::new(10, 8))
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(target)?;
                for (start, end) in [
                    (Point::new(8, 1), Point::new(8, 6)),
                    (Point::new(12, 1), Point::new(12, 6)),
                    (Point::new(10, 14), Point::new(10, 19)),
                ] {
                    Line::new(start, end).translate(origin).into_styled(thin).draw(target)?;
                }
            }
        }

        Ok(area)
    }
}

/// Gauge fill level for a charge percentage: `floor(percent / 20)` capped at 4.
pub fn battery_level(percent: u8) -> u8 {
    (percent / 20).min(BATTERY_LEVELS - 1)
}

/// Draw the battery gauge and return the area it covers.
pub fn draw_battery<D>(
    position: Point,
    percent: u8,
    color: Rgb565,
    target: &mut D,
) -> Result<Rectangle, D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let area = Rectangle::new(position - Point::new(0, GAUGE_SIZE.height as i32 / 2), GAUGE_SIZE);
    let origin = area.top_left;

    // Body and terminal
    Rectangle::new(origin, Size::new(20, GAUGE_SIZE.height))
        .into_styled(PrimitiveStyle::with_stroke(color, 1))
        .draw(target)?;
    Rectangle::new(origin + Point::new(20, 3), Size::new(2, 5))
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)?;

    let width = 16 * battery_level(percent) as u32 / (BATTERY_LEVELS as u32 - 1);
    if width > 0 {
        Rectangle::new(origin + Point::new(2, 2), Size::new(width, GAUGE_SIZE.height - 4))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(target)?;
    }

    Ok(area)
}
