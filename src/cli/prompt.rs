use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

use crate::registry::{HabitDefinition, HabitValue};

/// Reads lines until one parses as the habit's declared kind, reprompting on
/// failure. Hitting end of input is an error instead of looping forever.
pub fn prompt_value(
    input: &mut impl BufRead,
    output: &mut impl Write,
    def: &HabitDefinition,
) -> Result<HabitValue> {
    loop {
        write!(output, "    {}: ", def.label)?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .with_context(|| format!("reading a value for {}", def.key))?;
        if read == 0 {
            bail!("input ended before a value for {} was entered", def.key);
        }

        match def.kind.parse(&line) {
            Some(value) => return Ok(value),
            None => writeln!(output, "Enter valid number")?,
        }
    }
}

/// One value per habit, prompted in registry order.
pub fn prompt_values(
    input: &mut impl BufRead,
    output: &mut impl Write,
    habits: &[HabitDefinition],
) -> Result<Vec<HabitValue>> {
    habits
        .iter()
        .map(|def| prompt_value(input, output, def))
        .collect()
}
