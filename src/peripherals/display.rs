//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};

use pinetime_aksdark::{
    config::{LCD_H, LCD_W},
    Screen,
};

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W as u16, LCD_H as u16)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst))
            .map_err(|_| Error::Init)?;

        Ok(Self { lcd })
    }

    /// Push pending widget changes to the panel.
    pub fn render(&mut self, screen: &mut Screen) -> Result<(), Error> {
        screen.render(&mut self.lcd).map_err(|_| Error::Interface)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Controller did not come up
    Init,
    /// SPI transfer failed
    Interface,
}
