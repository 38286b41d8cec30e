mod parser;

use tnetstring::{Decoder, Encoder};
use std::io::{self, Read, Write};
use anyhow::{Context, Result};
use structopt::StructOpt;
use std::str::from_utf8;

/// Decode and print tnetstrings
#[derive(StructOpt)]
#[structopt(name = "tq", author = "Liv Fischer")]
struct Opt {
    /// parse a textual representation and encode it into binary tnetstrings instead
    #[structopt(short, long)]
    encode: bool,
}

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).context("Failed to read stdin")?;
    if opt.encode {
        encode(&buffer)
    } else {
        print(&buffer)
    }
}

/// Input may hold any number of concatenated tnetstrings, each gets printed on its own
fn print(buffer: &[u8]) -> Result<()> {
    for value in Decoder::decode_all(buffer).context("Decoding error")? {
        println!("{}", &value);
    }
    Ok(())
}

fn encode(buffer: &[u8]) -> Result<()> {
    let string = from_utf8(buffer).context("Input is not utf-8")?;
    let values = parser::parse(string)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for value in values.iter() {
        Encoder::encode(value, &mut out).context("Encoding error")?;
    }
    out.flush().context("Failed to write stdout")?;
    Ok(())
}
