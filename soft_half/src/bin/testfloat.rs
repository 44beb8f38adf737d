use std::io::{self, BufRead, Write};
use std::num::ParseIntError;

use clap::Parser;
use soft_half::{Context, RoundingMode, SoftFloat16};

/// Replays testfloat vectors read from stdin through soft_half.
///
/// Every input line holds the operands in hex followed by the expected result and the
/// exception flags; each output line repeats the operands, replaces the result with the one
/// computed here and echoes the flags.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// testfloat function name, e.g. `f16_add`, `f16_mulAdd`, `f32_to_f16`
    operation: String,

    /// Rounding mode (`near_even`, `minMag`, `min`, `max` or the snake_case names)
    #[arg(short, long, default_value = "near_even")]
    rounding: RoundingMode,
}

#[derive(Debug, thiserror::Error)]
enum HarnessError {
    #[error("`{word}` is not a hex operand")]
    InvalidHex {
        word: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: expected {expected} fields, found {found}")]
    MissingOperand {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Encodings as they appear in the test vectors.
trait ConvertHexStr: Sized {
    fn hex_str_to_value(s: &str) -> Result<Self, HarnessError>;
    fn value_to_hex_str(v: Self) -> String;
}

fn parse_hex<T>(
    s: &str,
    parse: fn(&str, u32) -> Result<T, ParseIntError>,
) -> Result<T, HarnessError> {
    parse(s, 16).map_err(|source| HarnessError::InvalidHex {
        word: s.to_owned(),
        source,
    })
}

impl ConvertHexStr for SoftFloat16 {
    fn hex_str_to_value(s: &str) -> Result<Self, HarnessError> {
        parse_hex(s, u16::from_str_radix).map(SoftFloat16::from_bits)
    }

    fn value_to_hex_str(v: Self) -> String {
        format!("{:04X}", SoftFloat16::to_bits(v))
    }
}

impl ConvertHexStr for f32 {
    fn hex_str_to_value(s: &str) -> Result<Self, HarnessError> {
        parse_hex(s, u32::from_str_radix).map(f32::from_bits)
    }

    fn value_to_hex_str(v: Self) -> String {
        format!("{:08X}", v.to_bits())
    }
}

impl ConvertHexStr for f64 {
    fn hex_str_to_value(s: &str) -> Result<Self, HarnessError> {
        parse_hex(s, u64::from_str_radix).map(f64::from_bits)
    }

    fn value_to_hex_str(v: Self) -> String {
        format!("{:016X}", v.to_bits())
    }
}

impl ConvertHexStr for i32 {
    fn hex_str_to_value(s: &str) -> Result<Self, HarnessError> {
        parse_hex(s, u32::from_str_radix).map(|bits| bits as i32)
    }

    fn value_to_hex_str(v: Self) -> String {
        format!("{:08X}", v as u32)
    }
}

fn unary<A: ConvertHexStr, R: ConvertHexStr>(
    words: &[&str],
    f: impl Fn(A) -> R,
) -> Result<String, HarnessError> {
    let result = f(A::hex_str_to_value(words[0])?);
    Ok(format!("{} {} {}", words[0], R::value_to_hex_str(result), words[2]))
}

fn binary(
    words: &[&str],
    f: impl Fn(SoftFloat16, SoftFloat16) -> SoftFloat16,
) -> Result<String, HarnessError> {
    let v0 = SoftFloat16::hex_str_to_value(words[0])?;
    let v1 = SoftFloat16::hex_str_to_value(words[1])?;
    Ok(format!(
        "{} {} {} {}",
        words[0],
        words[1],
        SoftFloat16::value_to_hex_str(f(v0, v1)),
        words[3]
    ))
}

fn compare(
    words: &[&str],
    f: impl Fn(SoftFloat16, SoftFloat16) -> bool,
) -> Result<String, HarnessError> {
    let v0 = SoftFloat16::hex_str_to_value(words[0])?;
    let v1 = SoftFloat16::hex_str_to_value(words[1])?;
    Ok(format!("{} {} {} {}", words[0], words[1], f(v0, v1) as u8, words[3]))
}

/// Number of whitespace separated fields a vector line of `operation` carries.
fn field_count(operation: &str) -> Result<usize, HarnessError> {
    match operation {
        "f16_to_f32" | "f32_to_f16" | "f16_to_f64" | "f64_to_f16" | "f16_to_i32"
        | "i32_to_f16" | "f16_to_i32_r_minMag" => Ok(3),
        "f16_add" | "f16_sub" | "f16_mul" | "f16_div" | "f16_eq" | "f16_le" | "f16_lt" => Ok(4),
        "f16_mulAdd" => Ok(5),
        _ => Err(HarnessError::UnknownOperation(operation.to_owned())),
    }
}

fn evaluate(ctx: &Context, operation: &str, words: &[&str]) -> Result<String, HarnessError> {
    match operation {
        "f16_add" => binary(words, |v0, v1| ctx.add(v0, v1)),
        "f16_sub" => binary(words, |v0, v1| ctx.sub(v0, v1)),
        "f16_mul" => binary(words, |v0, v1| ctx.mul(v0, v1)),
        "f16_div" => binary(words, |v0, v1| ctx.div(v0, v1)),
        "f16_eq" => compare(words, |v0, v1| {
            !SoftFloat16::is_nan(v0) && !SoftFloat16::is_nan(v1) && v0 == v1
        }),
        "f16_le" => compare(words, |v0, v1| {
            !SoftFloat16::is_nan(v0) && !SoftFloat16::is_nan(v1) && v0 <= v1
        }),
        "f16_lt" => compare(words, |v0, v1| {
            !SoftFloat16::is_nan(v0) && !SoftFloat16::is_nan(v1) && v0 < v1
        }),
        "f16_mulAdd" => {
            let v0 = SoftFloat16::hex_str_to_value(words[0])?;
            let v1 = SoftFloat16::hex_str_to_value(words[1])?;
            let v2 = SoftFloat16::hex_str_to_value(words[2])?;
            Ok(format!(
                "{} {} {} {} {}",
                words[0],
                words[1],
                words[2],
                SoftFloat16::value_to_hex_str(ctx.mul_add(v0, v1, v2)),
                words[4]
            ))
        }
        "f16_to_f32" => unary(words, SoftFloat16::to_f32),
        "f16_to_f64" => unary(words, SoftFloat16::to_f64),
        "f32_to_f16" => unary(words, |v: f32| ctx.from_f32(v)),
        "f64_to_f16" => unary(words, |v: f64| ctx.from_f64(v)),
        "f16_to_i32" => unary(words, |v: SoftFloat16| ctx.to_i32(v)),
        "f16_to_i32_r_minMag" => unary(words, |v: SoftFloat16| {
            SoftFloat16::to_i32(v, RoundingMode::TowardZero)
        }),
        "i32_to_f16" => unary(words, |v: i32| ctx.from_i32(v)),
        _ => Err(HarnessError::UnknownOperation(operation.to_owned())),
    }
}

fn main() -> Result<(), HarnessError> {
    env_logger::init();
    let args = Args::parse();
    let ctx = Context::new(args.rounding);
    let expected = field_count(&args.operation)?;
    log::debug!("running {} with {}", args.operation, ctx.rounding);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0;
    for (index, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        let words = line.split_whitespace().collect::<Vec<&str>>();
        if words.is_empty() {
            continue;
        }
        if words.len() < expected {
            return Err(HarnessError::MissingOperand {
                line: index + 1,
                expected,
                found: words.len(),
            });
        }

        // exception flags are echoed, not computed
        let s = evaluate(&ctx, &args.operation, &words)?;
        writeln!(out, "{}", s)?;
        count += 1;
    }
    log::debug!("{} vectors processed", count);
    Ok(())
}
