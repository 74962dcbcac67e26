use clap::Parser;
use log::info;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use jp2::{
    decode_boxes, BitDepth, ColourSpecificationBox, HeaderSuperBox, ImageHeaderBox, JBox, JP2Error,
    Jp2Box, ENUMERATED_COLOUR_SPACE_SRGB,
};

#[derive(Debug, thiserror::Error)]
enum JP2000Error {
    #[error("error decoding jp2 boxes {error}")]
    DecodingBoxes { error: JP2Error },

    #[error("error building jp2 header box {error}")]
    BuildingHeader { error: JP2Error },

    #[error("error writing {path:?}: {error}")]
    Writing { path: PathBuf, error: io::Error },
}

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    subcommand: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
    /// Decode the boxes of a .jp2 file and print them as a tree (stdout)
    Inspect(Inspect),

    /// Write a JP2 Header box built from the given image properties
    Header(Header),
}

#[derive(Parser)]
struct Inspect {
    /// Path to .jp2 file
    path: PathBuf,
}

#[derive(Parser)]
struct Header {
    /// Image area width in reference grid points
    #[clap(long)]
    width: u32,

    /// Image area height in reference grid points
    #[clap(long)]
    height: u32,

    /// Number of components
    #[clap(long, default_value = "3")]
    components: u16,

    /// Bit depth of every component
    #[clap(long, default_value = "8", value_parser = clap::value_parser!(u8).range(1..=38))]
    bit_depth: u8,

    /// Components are signed
    #[clap(long)]
    signed: bool,

    /// Enumerated colourspace of the Colour Specification box
    #[clap(long, default_value_t = ENUMERATED_COLOUR_SPACE_SRGB)]
    colourspace: u32,

    /// Mark the colourspace as unknown in the Image Header box
    #[clap(long)]
    unknown_colourspace: bool,

    /// Mark the file as carrying intellectual property rights information
    #[clap(long)]
    intellectual_property: bool,

    /// Path of the file to write the box to
    output: PathBuf,
}

fn inspect(c: Inspect) -> Result<(), Box<dyn Error>> {
    let file = File::open(&c.path)?;
    let mut reader = BufReader::new(file);

    let boxes = match decode_boxes(&mut reader) {
        Ok(boxes) => boxes,
        Err(error) => return Err(JP2000Error::DecodingBoxes { error }.into()),
    };

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    for jbox in &boxes {
        print_box(&mut writer, jbox, 0)?;
    }
    Ok(())
}

fn print_box<W: Write>(writer: &mut W, jbox: &Jp2Box, depth: usize) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    write!(writer, "{}{} ({} bytes)", indent, jbox.identifier(), jbox.length())?;
    match jbox {
        Jp2Box::ImageHeader(image_header_box) => writeln!(
            writer,
            " {}x{}, {} components, bit depth {:?}",
            image_header_box.width(),
            image_header_box.height(),
            image_header_box.components_num(),
            image_header_box.components_bits()
        ),
        Jp2Box::ColourSpecification(colour_specification_box) => {
            writeln!(writer, " {}", colour_specification_box.method())
        }
        Jp2Box::Header(header_box) => {
            writeln!(writer)?;
            for child in header_box.children() {
                print_box(writer, child, depth + 1)?;
            }
            Ok(())
        }
        Jp2Box::Resolution(resolution_box) => {
            writeln!(writer)?;
            for child in resolution_box.children() {
                print_box(writer, child, depth + 1)?;
            }
            Ok(())
        }
        _ => writeln!(writer),
    }
}

fn build_header(c: &Header) -> Result<HeaderSuperBox, JP2Error> {
    let bit_depth = if c.signed {
        BitDepth::Signed { value: c.bit_depth }
    } else {
        BitDepth::Unsigned { value: c.bit_depth }
    };

    let mut header_box = HeaderSuperBox::new();
    header_box
        .add(ImageHeaderBox::new(
            c.width,
            c.height,
            c.components,
            bit_depth.encoded(),
            c.unknown_colourspace,
            c.intellectual_property,
        ))?
        .add(ColourSpecificationBox::enumerated(c.colourspace))?;
    Ok(header_box)
}

fn header(c: Header) -> Result<(), Box<dyn Error>> {
    let header_box = match build_header(&c) {
        Ok(header_box) => header_box,
        Err(error) => return Err(JP2000Error::BuildingHeader { error }.into()),
    };

    let file = match File::create(&c.output) {
        Ok(file) => file,
        Err(error) => {
            return Err(JP2000Error::Writing {
                path: c.output,
                error,
            }
            .into())
        }
    };
    let mut writer = BufWriter::new(file);
    header_box.encode(&mut writer)?;
    writer.flush()?;

    info!(
        "Wrote {} byte JP2 Header box to {:?}",
        header_box.length(),
        c.output
    );
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opts: Opts = Opts::parse();

    match opts.subcommand {
        SubCommand::Inspect(c) => inspect(c),
        SubCommand::Header(c) => header(c),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    match run() {
        Err(e) => Err(e.to_string().into()),
        Ok(_) => Ok(()),
    }
}
