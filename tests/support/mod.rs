//! Synthetic module images for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

fn put(data: &mut [u8], at: usize, bytes: &[u8]) {
    data[at..at + bytes.len()].copy_from_slice(bytes);
}

fn padded(name: &str, width: usize) -> Vec<u8> {
    let mut field = vec![0u8; width];
    field[..name.len()].copy_from_slice(name.as_bytes());
    field
}

/// ProTracker M.K. module with up to 31 sample names.
pub fn protracker(title: &str, samples: &[&str]) -> Vec<u8> {
    let mut data = vec![0u8; 1084];
    put(&mut data, 0, title.as_bytes());
    for (i, name) in samples.iter().enumerate() {
        put(&mut data, 20 + i * 30, name.as_bytes());
    }
    data[950] = 1;
    put(&mut data, 1080, b"M.K.");
    // one empty pattern
    data.extend_from_slice(&[0u8; 1024]);
    data
}

/// Untagged 15-sample Soundtracker module with one pattern.
pub fn soundtracker(title: &str, samples: &[&str]) -> Vec<u8> {
    let mut data = vec![0u8; 600 + 1024];
    put(&mut data, 0, title.as_bytes());
    for (i, name) in samples.iter().enumerate() {
        put(&mut data, 20 + i * 30, name.as_bytes());
        data[20 + i * 30 + 25] = 64;
    }
    data[470] = 1;
    data[471] = 120;
    data
}

/// Scream Tracker 3 module.
pub fn scream3(title: &str, samples: &[&str]) -> Vec<u8> {
    let table = 0x60 + 2;
    let first = (table + samples.len() * 2).div_ceil(16) * 16;
    let mut data = vec![0u8; first + samples.len() * 0x50];
    put(&mut data, 0, title.as_bytes());
    data[0x1C] = 0x1A;
    data[0x1D] = 16;
    put(&mut data, 0x20, &2u16.to_le_bytes());
    put(&mut data, 0x22, &(samples.len() as u16).to_le_bytes());
    put(&mut data, 0x2C, b"SCRM");
    data[0x60] = 0;
    data[0x61] = 0xFF;
    for (i, name) in samples.iter().enumerate() {
        let header = first + i * 0x50;
        put(&mut data, table + i * 2, &((header / 16) as u16).to_le_bytes());
        data[header] = 1;
        put(&mut data, header + 0x30, name.as_bytes());
        put(&mut data, header + 0x4C, b"SCRS");
    }
    data
}

/// FastTracker 2 module; each instrument lists its sample names.
pub fn fasttracker(title: &str, instruments: &[(&str, &[&str])]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(b"Extended Module: ");
    data.extend_from_slice(&padded(title, 20));
    data.push(0x1A);
    data.extend_from_slice(&padded("FastTracker v2.00", 20));
    data.extend_from_slice(&0x0104u16.to_le_bytes());
    data.extend_from_slice(&276u32.to_le_bytes());
    for value in [1u16, 0, 4, 0, instruments.len() as u16, 1, 6, 125] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    data.extend_from_slice(&[0u8; 256]);

    for (name, samples) in instruments {
        let header_len: u32 = if samples.is_empty() { 29 } else { 263 };
        let start = data.len();
        data.extend_from_slice(&header_len.to_le_bytes());
        data.extend_from_slice(&padded(name, 22));
        data.push(0);
        data.extend_from_slice(&(samples.len() as u16).to_le_bytes());
        if !samples.is_empty() {
            data.extend_from_slice(&40u32.to_le_bytes());
        }
        data.resize(start + header_len as usize, 0);
        for sample in samples.iter() {
            data.extend_from_slice(&2u32.to_le_bytes());
            data.extend_from_slice(&[0u8; 14]);
            data.extend_from_slice(&padded(sample, 22));
        }
        for _ in samples.iter() {
            data.extend_from_slice(&[0u8; 2]);
        }
    }
    data
}

/// Impulse Tracker module in instrument mode.
pub fn impulse(title: &str, message: Option<&str>, samples: &[&str], instruments: &[&str]) -> Vec<u8> {
    let table = 0xC0 + 2;
    let mut data = vec![0u8; table + (instruments.len() + samples.len()) * 4];
    put(&mut data, 0, b"IMPM");
    put(&mut data, 4, title.as_bytes());
    put(&mut data, 0x20, &2u16.to_le_bytes());
    put(&mut data, 0x22, &(instruments.len() as u16).to_le_bytes());
    put(&mut data, 0x24, &(samples.len() as u16).to_le_bytes());
    put(&mut data, 0x28, &0x0214u16.to_le_bytes());
    put(&mut data, 0x2A, &0x0214u16.to_le_bytes());
    put(&mut data, 0x2C, &0x000Du16.to_le_bytes());
    data[0xC0] = 0;
    data[0xC1] = 0xFF;

    for (i, name) in instruments.iter().enumerate() {
        let ptr = data.len() as u32;
        put(&mut data, table + i * 4, &ptr.to_le_bytes());
        let mut header = vec![0u8; 554];
        put(&mut header, 0, b"IMPI");
        put(&mut header, 0x20, name.as_bytes());
        data.extend_from_slice(&header);
    }
    for (i, name) in samples.iter().enumerate() {
        let ptr = data.len() as u32;
        put(&mut data, table + (instruments.len() + i) * 4, &ptr.to_le_bytes());
        let mut header = vec![0u8; 80];
        put(&mut header, 0, b"IMPS");
        put(&mut header, 0x14, name.as_bytes());
        data.extend_from_slice(&header);
    }
    if let Some(message) = message {
        let offset = data.len() as u32;
        put(&mut data, 0x2E, &1u16.to_le_bytes());
        put(&mut data, 0x36, &((message.len() + 1) as u16).to_le_bytes());
        put(&mut data, 0x38, &offset.to_le_bytes());
        data.extend_from_slice(message.replace('\n', "\r").as_bytes());
        data.push(0);
    }
    data
}

fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0u16;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xA001 } else { crc >> 1 };
        }
    }
    crc
}

/// Single-member LHA archive, level 0 header, stored (`-lh0-`).
pub fn lha_stored(name: &str, payload: &[u8]) -> Vec<u8> {
    let mut header = Vec::new();
    header.extend_from_slice(b"-lh0-");
    header.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    header.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    header.extend_from_slice(&0x5A21_0000u32.to_le_bytes());
    header.push(0x20);
    header.push(0);
    header.push(name.len() as u8);
    header.extend_from_slice(name.as_bytes());
    header.extend_from_slice(&crc16(payload).to_le_bytes());

    let checksum = header.iter().fold(0u8, |sum, &b| sum.wrapping_add(b));
    let mut archive = vec![header.len() as u8, checksum];
    archive.extend_from_slice(&header);
    archive.extend_from_slice(payload);
    archive.push(0);
    archive
}

/// Write `bytes` to `dir/name`.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write test module");
    path
}
