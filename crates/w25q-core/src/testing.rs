//! Recording bus for unit tests

use std::vec;
use std::vec::Vec;

use crate::bus::SpiBus;
use crate::error::{Error, Result};

/// One call made on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    Transmit(Vec<u8>),
    Receive(usize),
}

/// Bus that records every call and answers reads from a reply queue
#[derive(Default)]
pub struct RecordingBus {
    pub events: Vec<Event>,
    replies: Vec<u8>,
    next_reply: usize,
    /// Fail the n-th transmit/receive (0-based)
    fail_transfer: Option<usize>,
    transfers: usize,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes handed out by `receive`, in order; zeros once exhausted
    pub fn with_replies(replies: &[u8]) -> Self {
        Self {
            replies: replies.to_vec(),
            ..Self::default()
        }
    }

    pub fn failing_transfer(n: usize) -> Self {
        Self {
            fail_transfer: Some(n),
            ..Self::default()
        }
    }

    pub fn selects(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Select).count()
    }

    pub fn deselects(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Deselect).count()
    }

    /// First transmitted byte of every bracket
    pub fn opcodes(&self) -> Vec<u8> {
        let mut opcodes = vec![];
        let mut first = false;
        for event in &self.events {
            match event {
                Event::Select => first = true,
                Event::Transmit(bytes) if first => {
                    opcodes.push(bytes[0]);
                    first = false;
                }
                _ => {}
            }
        }
        opcodes
    }

    /// Every transmitted byte, flattened
    pub fn transmitted(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Transmit(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    fn check_fail(&mut self) -> Result<()> {
        let n = self.transfers;
        self.transfers += 1;
        if self.fail_transfer == Some(n) {
            return Err(Error::SpiTransferFailed);
        }
        Ok(())
    }
}

impl SpiBus for RecordingBus {
    fn select(&mut self) -> Result<()> {
        self.events.push(Event::Select);
        Ok(())
    }

    fn deselect(&mut self) -> Result<()> {
        self.events.push(Event::Deselect);
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_fail()?;
        self.events.push(Event::Transmit(bytes.to_vec()));
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<()> {
        self.check_fail()?;
        for byte in buf.iter_mut() {
            *byte = self.replies.get(self.next_reply).copied().unwrap_or(0);
            self.next_reply += 1;
        }
        self.events.push(Event::Receive(buf.len()));
        Ok(())
    }
}
