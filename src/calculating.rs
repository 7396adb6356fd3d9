use crate::error_handling::*;
use crate::evaluating::*;
use crate::parsing::*;
use crate::scanning::*;

use std::io::Write;

/// Drives one expression session: buffers digits into numerals, feeds
/// tokens to the tree, echoes the tape, and on '=' completes, evaluates,
/// emits the result and resets for the next expression.
pub struct Calculator<W: Write> {
    tree: SyntaxTree,
    buffer: String,
    output: W,
}

impl<W: Write> Calculator<W> {
    pub fn new(output: W) -> Self {
        Self {
            tree: SyntaxTree::new(),
            buffer: String::new(),
            output,
        }
    }

    pub fn receive(&mut self, input: char) -> Result<()> {
        if let Some(operator) = Operator::from_char(input) {
            self.flush_number()?;
            self.receive_operator(operator)
        } else if input.is_ascii_digit() {
            self.buffer.push(input);
            self.echo_char(input)
        } else if input == '(' {
            // An opening parenthesis does not flush the pending numeral.
            self.tree.add(Token::open_paren);
            self.echo("( ")
        } else if input == ')' {
            self.flush_number()?;
            if self.tree.add(Token::close_paren) {
                self.echo(" )")
            } else {
                Err(CalcError::unmatched_parenthesis)
            }
        } else if input == '.' && !self.buffer.contains('.') {
            if self.buffer.is_empty() {
                self.buffer.push('0');
                self.echo_char('0')?;
            }
            self.buffer.push('.');
            self.echo_char('.')
        } else {
            Ok(())
        }
    }

    fn receive_operator(&mut self, operator: Operator) -> Result<()> {
        if operator != Operator::equals {
            self.tree.add(Token::operator(operator));
        }

        self.echo_char(' ')?;
        self.echo_char(operator.symbol())?;
        self.echo_char(' ')?;

        if operator == Operator::equals {
            if let Some(root) = self.tree.complete() {
                let result = evaluate(&self.tree, root);
                log::debug!("completed expression\n{}", self.tree.render(root));
                writeln!(self.output, "{}", result)?;
                self.tree.reset();
            }
        }
        Ok(())
    }

    // A numeral is flushed the moment something other than a digit or the
    // first '.' arrives; a parse failure discards the buffered text.
    fn flush_number(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut self.buffer);
        let value: f64 = pending
            .parse()
            .map_err(|_| CalcError::invalid_number(pending))?;
        self.tree.add(Token::literal(value));
        Ok(())
    }

    fn echo(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{}", text)?;
        Ok(())
    }

    fn echo_char(&mut self, character: char) -> Result<()> {
        write!(self.output, "{}", character)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn transcript(input: &str) -> String {
        let mut sink = Vec::new();
        let mut calculator = Calculator::new(&mut sink);
        for character in input.chars() {
            let _ = calculator.receive(character);
        }
        drop(calculator);
        String::from_utf8(sink).unwrap()
    }

    #[test]
    fn digits_and_decimal_point_echo_as_typed() {
        assert_eq!("123.4", transcript("123.4"));
    }

    #[test]
    fn leading_decimal_point_gains_a_zero() {
        assert_eq!("0.5", transcript(".5"));
    }

    #[test]
    fn second_decimal_point_is_ignored() {
        assert_eq!("1.23", transcript("1.2.3"));
    }

    #[test]
    fn simple_operations_echo_the_tape_and_the_result() {
        let cases = [
            ("123+111=", "123 + 111 = 234\n"),
            ("123-111=", "123 - 111 = 12\n"),
            ("9/3=", "9 / 3 = 3\n"),
            ("5*5=", "5 x 5 = 25\n"),
            ("1+2*3+4=", "1 + 2 x 3 + 4 = 11\n"),
            ("5*8-1=", "5 x 8 - 1 = 39\n"),
        ];
        for (input, expected) in cases {
            assert_eq!(expected, transcript(input));
        }
    }

    #[test]
    fn precedence_holds_across_a_whole_tape() {
        assert_eq!("1 + 2 x 3 + 4 / 5 = 7.8\n", transcript("1+2*3+4/5="));
    }

    #[test]
    fn x_key_multiplies_like_the_asterisk() {
        assert_eq!("5 x 5 = 25\n", transcript("5x5="));
    }

    #[test]
    fn parenthesized_group_is_one_operand() {
        assert_eq!("( 1 + 2 ) x 3 = 9\n", transcript("(1+2)*3="));
    }

    #[test]
    fn division_by_zero_emits_zero() {
        assert_eq!("5 / 0 = 0\n", transcript("5/0="));
    }

    #[test]
    fn unmatched_close_parenthesis_is_reported_and_skipped() {
        let mut sink = Vec::new();
        let mut calculator = Calculator::new(&mut sink);
        assert!(matches!(
            calculator.receive(')'),
            Err(CalcError::unmatched_parenthesis)
        ));
        assert!(calculator.receive('5').is_ok());
        assert!(calculator.receive('=').is_ok());
        drop(calculator);
        assert_eq!("5 = 5\n", String::from_utf8(sink).unwrap());
    }

    #[test]
    fn equals_inside_an_open_scope_keeps_the_session_alive() {
        assert_eq!("( 1 + 2 =  ) = 3\n", transcript("(1+2=)="));
    }

    #[test]
    fn equals_on_an_empty_session_emits_no_result() {
        assert_eq!(" = ", transcript("="));
    }

    #[test]
    fn unknown_characters_are_ignored() {
        assert_eq!("1 + 2 = 3\n", transcript("1a+b2=?"));
    }

    #[test]
    fn session_resets_after_each_result() {
        assert_eq!("1 + 2 = 3\n4 x 4 = 16\n", transcript("1+2=4*4="));
    }
}
