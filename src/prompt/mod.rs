use anyhow::{bail, Context};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use thiserror::Error;
use crate::report::MonthKey;

const PROMPT: &str = "\nEnter the number of the month you want to analyze: ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SelectionError {
    #[error("Invalid input. Please enter a number.")]
    NotANumber,

    #[error("Invalid selection. Please enter a number from the list.")]
    OutOfRange,
}

/// Turn a 1-based menu choice into an index into a list of `count` entries
pub(crate) fn parse_selection(input: &str, count: usize) -> Result<usize, SelectionError> {
    let selection = input.trim().parse::<usize>().map_err(|_| SelectionError::NotANumber)?;
    if selection >= 1 && selection <= count {
        Ok(selection - 1)
    } else {
        Err(SelectionError::OutOfRange)
    }
}

/// Ask on the terminal which month to report on. Keeps asking until the answer is valid.
pub(crate) fn select_month(months: &[MonthKey]) -> anyhow::Result<MonthKey> {
    let mut rl = DefaultEditor::new().context("unable to open terminal for month selection")?;
    select_month_with(months, |prompt| match rl.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(err) => Err(err).context("reading month selection"),
    })
}

/// Month selection loop over any line source. `read_line` returns `None` when input ends.
fn select_month_with<F>(months: &[MonthKey], mut read_line: F) -> anyhow::Result<MonthKey>
where
    F: FnMut(&str) -> anyhow::Result<Option<String>>,
{
    if months.is_empty() {
        bail!("no months with dated transactions to choose from");
    }

    println!("Available months:");
    for (i, month) in months.iter().enumerate() {
        println!("{}. {}", i + 1, month);
    }

    loop {
        let Some(line) = read_line(PROMPT)? else {
            bail!("month selection aborted");
        };
        match parse_selection(&line, months.len()) {
            Ok(index) => return Ok(months[index]),
            Err(e) => println!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::prompt::{parse_selection, select_month_with, SelectionError};
    use crate::report::MonthKey;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("1", 3), Ok(0));
        assert_eq!(parse_selection(" 3 \n", 3), Ok(2));
        assert_eq!(parse_selection("", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("abc", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("-1", 3), Err(SelectionError::NotANumber));
        assert_eq!(parse_selection("0", 3), Err(SelectionError::OutOfRange));
        assert_eq!(parse_selection("4", 3), Err(SelectionError::OutOfRange));
    }

    #[test]
    fn test_reprompts_until_valid() {
        let months = vec![MonthKey { year: 2024, month: 2 }, MonthKey { year: 2024, month: 1 }];
        let mut answers = vec!["two", "0", "3", "2"].into_iter();
        let mut prompts = 0;

        let selected = select_month_with(&months, |_| {
            prompts += 1;
            Ok(answers.next().map(str::to_string))
        }).unwrap();

        assert_eq!(selected, MonthKey { year: 2024, month: 1 });
        assert_eq!(prompts, 4);
    }

    #[test]
    fn test_end_of_input_aborts() {
        let months = vec![MonthKey { year: 2024, month: 2 }];
        assert!(select_month_with(&months, |_| Ok(None)).is_err());
        assert!(select_month_with(&[], |_| Ok(Some("1".to_string()))).is_err());
    }
}
