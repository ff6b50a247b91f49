// xmltv
// Copyright 2015-2026 xmltv developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use xmltv::{ReadRecords, XmltvEvent};

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args();
    let name = args.next().unwrap_or_else(|| "xmltv_dump".to_string());
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("Usage: {} <file>", name);
            std::process::exit(2);
        }
    };

    let file = File::open(&path).with_context(|| format!("Couldn't open file {}", path))?;
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut count = 0u64;
    for event in ReadRecords::new(file) {
        let event = event.with_context(|| format!("Failed to parse {}", path))?;
        if event == XmltvEvent::End {
            break;
        }
        serde_json::to_writer(&mut out, &event)?;
        writeln!(out)?;
        count += 1;
    }
    out.flush()?;

    info!("Dumped {} records from {}", count, path);
    Ok(())
}
