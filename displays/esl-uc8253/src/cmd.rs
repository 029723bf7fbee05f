//! UC8253 command set
//!
//! Register addresses and the data byte values the tag uses with them.

pub struct Cmd;

#[allow(dead_code)]
impl Cmd {
    pub const PANEL_SETTING: u8 = 0x00;
    pub const POWER_OFF: u8 = 0x02;
    pub const POWER_ON: u8 = 0x04;
    pub const DEEP_SLEEP: u8 = 0x07;
    pub const DATA_START_OLD: u8 = 0x10;
    pub const DISPLAY_REFRESH: u8 = 0x12;
    pub const DATA_START_NEW: u8 = 0x13;
    pub const VCOM_INTERVAL: u8 = 0x50;
    pub const CASCADE_SETTING: u8 = 0xE0;
    pub const FORCE_TEMPERATURE: u8 = 0xE5;
}

pub struct Flag;

#[allow(dead_code)]
impl Flag {
    /// PANEL_SETTING: black/white, LUT from OTP, scan directions for the
    /// 240x416 glass
    pub const PANEL_DEFAULT: u8 = 0x1B;
    /// CASCADE_SETTING: route the forced temperature into LUT selection
    pub const CASCADE_TSFIX: u8 = 0x02;
    /// FORCE_TEMPERATURE value selecting the partial-update waveform
    pub const TEMP_PARTIAL: u8 = 0x6E;
    /// FORCE_TEMPERATURE value selecting the fast full-update waveform
    pub const TEMP_FAST: u8 = 0x5F;
    /// VCOM_INTERVAL: keep border floating during partial refresh
    pub const VCOM_DEFAULT: u8 = 0xD7;
    /// DEEP_SLEEP only takes effect with this check byte
    pub const DEEP_SLEEP_CHECK: u8 = 0xA5;
}
