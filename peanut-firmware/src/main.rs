//! Peanut - Graphing Calculator Firmware
//!
//! Boots an RP2350 handheld: one SPI controller shared by the ILI9341 panel
//! and the SD card, a 6x4 matrix keypad, and a single cooperative UI loop
//! that plots into an adaptive framebuffer.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::Spi;
use embedded_alloc::LlffHeap as Heap;
use {defmt_rtt as _, panic_probe as _};

use peanut_core::bus::{BusArbiter, BusMode};
use peanut_core::keypad::KeyScanner;
use peanut_drivers::display::Ili9341;
use peanut_drivers::keypad::GpioMatrix;
use peanut_hal_rp::spi::embassy_config;
use peanut_hal_rp::{BlockingDelay, RpInput, RpOutput, RpSpi};

mod config;
mod demo;
mod memory;
mod tasks;

/// Boot ROM image definition
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: embassy_rp::block::ImageDef = embassy_rp::block::ImageDef::secure_exe();

#[global_allocator]
static HEAP: Heap = Heap::empty();

// Room for a native 320x240 frame plus meshes and the config copy
const HEAP_SIZE: usize = 256 * 1024;

/// Attempts at the first switch into display mode
const BUS_RETRIES: u8 = 3;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Peanut firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // SPI1: SCK 10, MOSI 11, MISO 12
    let profile = config.bus_profile();
    let spi = Spi::new_blocking(
        p.SPI1,
        p.PIN_10,
        p.PIN_11,
        p.PIN_12,
        embassy_config(profile.config(BusMode::Display)),
    );
    let display_cs = RpOutput(Output::new(p.PIN_13, Level::High));
    let storage_cs = RpOutput(Output::new(p.PIN_17, Level::High));
    let mut arbiter = BusArbiter::new(RpSpi::new(spi), display_cs, storage_cs, profile);

    if let Err(fault) = arbiter.retry_switch(BusMode::Display, BUS_RETRIES) {
        error!("Bus stuck before panel init: {}", fault);
    }

    let mut panel = Ili9341::new(
        RpOutput(Output::new(p.PIN_15, Level::Low)),
        RpOutput(Output::new(p.PIN_14, Level::High)),
        BlockingDelay,
        config.display.width,
        config.display.height,
    );
    match panel.init(&mut arbiter) {
        Ok(()) => info!("Panel ready"),
        Err(fault) => warn!("Panel init failed: {}", fault),
    }

    // Rows 6, 7, 8, 9, 21, 27 are driven; columns 2-5 are pulled up
    let rows = [
        RpOutput(Output::new(p.PIN_6, Level::High)),
        RpOutput(Output::new(p.PIN_7, Level::High)),
        RpOutput(Output::new(p.PIN_8, Level::High)),
        RpOutput(Output::new(p.PIN_9, Level::High)),
        RpOutput(Output::new(p.PIN_21, Level::High)),
        RpOutput(Output::new(p.PIN_27, Level::High)),
    ];
    let cols = [
        RpInput(Input::new(p.PIN_2, Pull::Up)),
        RpInput(Input::new(p.PIN_3, Pull::Up)),
        RpInput(Input::new(p.PIN_4, Pull::Up)),
        RpInput(Input::new(p.PIN_5, Pull::Up)),
    ];
    let matrix = GpioMatrix::new(rows, cols, BlockingDelay, config.keypad.settle_us);
    let mut scanner = KeyScanner::new(matrix, config.scan_timing());
    info!("Keypad ready");

    tasks::ui::run(&config, &mut arbiter, &mut panel, &mut scanner).await
}

fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}
