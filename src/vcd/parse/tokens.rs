//! Lexes a trace into a forward-only stream of [`Token`]s.
use std::io::Read;

use super::super::errors::{Cursor, VcdError};
use super::super::reader::WordReader;
use super::super::signal::SignalType;
use super::super::types::{ScopeType, Timescale};
use super::combinator_atoms::tag;
use super::metadata::parse_timescale;
use super::types::ParseResult;

/// Commands in the value change section that wrap a block of value changes
/// terminated by a bare `$end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimulationCommand {
    DumpAll,
    DumpOff,
    DumpOn,
    DumpVars,
}

/// The raw value carried by a value change, before it is decoded onto a
/// signal's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeValue {
    /// `1!`, `x#` and friends.
    Scalar(char),
    /// Digits following `b`, which may include `x`, `z` and the other 4-state
    /// characters.
    Vector(String),
    /// Literal following `r`, already checked to be a valid float.
    Real(String),
    /// Text following `s`.
    Str(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Date(String),
    Version(String),
    Timescale(u32, Timescale),
    Comment(String),
    ScopeBegin {
        name: String,
        scope_type: ScopeType,
    },
    ScopeEnd,
    VarDecl {
        name: String,
        signal_type: SignalType,
        num_bits: u32,
        id_code: String,
        index: Option<String>,
    },
    EndDefinitions,
    SimulationCommand(SimulationCommand),
    SimulationCommandEnd,
    Time(u64),
    ValueChange {
        id_code: String,
        value: ChangeValue,
    },
}

/// Single pass tokenizer over a trace. Once an error has been yielded the
/// tokenizer is exhausted.
pub struct Tokenizer<R: Read> {
    word_reader: WordReader<R>,
    open_command: Option<SimulationCommand>,
    token_cursor: Cursor,
    done: bool,
}

pub fn tokenize<R: Read>(reader: R) -> Tokenizer<R> {
    Tokenizer {
        word_reader: WordReader::new(reader),
        open_command: None,
        token_cursor: Cursor::start(),
        done: false,
    }
}

fn is_scalar_value(chr: char) -> bool {
    matches!(
        chr,
        '0' | '1' | 'x' | 'X' | 'z' | 'Z' | 'u' | 'U' | 'w' | 'W' | 'l' | 'L' | 'h' | 'H' | '-'
    )
}

impl<R: Read> Tokenizer<R> {
    /// Location of the first word of the most recently yielded token.
    pub fn cursor(&self) -> Cursor {
        self.token_cursor
    }

    /// Collects every word up to the `$end` closing `command`.
    fn words_until_end(&mut self, command: &str) -> Result<Vec<String>, VcdError> {
        let mut words = vec![];
        loop {
            match self.word_reader.next_word()? {
                Some((word, _)) if word == "$end" => return Ok(words),
                Some((word, _)) => words.push(word),
                None => {
                    return Err(VcdError::format(
                        self.token_cursor,
                        format!("reached end of file before `$end` closing `${command}`"),
                    ))
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, VcdError> {
        let (word, cursor) = match self.word_reader.next_word()? {
            Some(next) => next,
            None => {
                return match self.open_command {
                    Some(command) => Err(VcdError::format(
                        self.word_reader.cursor(),
                        format!("reached end of file inside unterminated {command:?} block"),
                    )),
                    None => Ok(None),
                };
            }
        };
        self.token_cursor = cursor;

        let ParseResult { matched, residual } = tag(&word, "$");
        if !matched.is_empty() {
            return self.parse_command(residual).map(Some);
        }

        let ParseResult { matched, residual } = tag(&word, "#");
        if !matched.is_empty() {
            let time = residual.parse::<u64>().map_err(|_| {
                VcdError::format(cursor, format!("failed to parse `{residual}` as a timestamp"))
            })?;
            return Ok(Some(Token::Time(time)));
        }

        self.parse_value_change(&word).map(Some)
    }

    fn parse_command(&mut self, keyword: &str) -> Result<Token, VcdError> {
        let cursor = self.token_cursor;
        match keyword {
            "date" => Ok(Token::Date(self.words_until_end(keyword)?.join(" "))),
            "version" => Ok(Token::Version(self.words_until_end(keyword)?.join(" "))),
            "comment" => Ok(Token::Comment(self.words_until_end(keyword)?.join(" "))),
            "timescale" => {
                let words = self.words_until_end(keyword)?;
                let (magnitude, unit) = parse_timescale(&words, cursor)?;
                Ok(Token::Timescale(magnitude, unit))
            }
            "scope" => self.parse_scope(),
            "upscope" => {
                let words = self.words_until_end(keyword)?;
                match words.first() {
                    None => Ok(Token::ScopeEnd),
                    Some(word) => Err(VcdError::format(
                        cursor,
                        format!("unexpected `{word}` in `$upscope`"),
                    )),
                }
            }
            "var" => self.parse_var(),
            "enddefinitions" => {
                self.words_until_end(keyword)?;
                Ok(Token::EndDefinitions)
            }
            "dumpall" | "dumpoff" | "dumpon" | "dumpvars" => {
                let command = match keyword {
                    "dumpall" => SimulationCommand::DumpAll,
                    "dumpoff" => SimulationCommand::DumpOff,
                    "dumpon" => SimulationCommand::DumpOn,
                    _ => SimulationCommand::DumpVars,
                };
                if let Some(open) = self.open_command {
                    return Err(VcdError::format(
                        cursor,
                        format!("`${keyword}` opened inside unterminated {open:?} block"),
                    ));
                }
                self.open_command = Some(command);
                Ok(Token::SimulationCommand(command))
            }
            "end" => match self.open_command.take() {
                Some(_) => Ok(Token::SimulationCommandEnd),
                None => Err(VcdError::format(cursor, "found `$end` without an open command")),
            },
            _ => Err(VcdError::format(
                cursor,
                format!("found unknown keyword `${keyword}`"),
            )),
        }
    }

    fn parse_scope(&mut self) -> Result<Token, VcdError> {
        let cursor = self.token_cursor;
        let words = self.words_until_end("scope")?;

        // $scope module reg_mag_i $end
        //        ^^^^^^ - scope type
        let keyword = words
            .first()
            .ok_or_else(|| VcdError::format(cursor, "`$scope` is missing its scope type"))?;
        let scope_type = ScopeType::from_keyword(keyword).ok_or_else(|| {
            VcdError::format(cursor, format!("found unknown scope type `{keyword}`"))
        })?;

        // $scope module reg_mag_i $end
        //               ^^^^^^^^^ - scope name
        // Some simulators emit scopes without names. We tolerate them and
        // give them an empty name.
        let name = words[1..].join(" ");

        Ok(Token::ScopeBegin { name, scope_type })
    }

    fn parse_var(&mut self) -> Result<Token, VcdError> {
        let cursor = self.token_cursor;
        let words = self.words_until_end("var")?;
        if words.len() < 4 {
            return Err(VcdError::format(
                cursor,
                format!("incomplete `$var` declaration `{}`", words.join(" ")),
            ));
        }

        // $var parameter 3 a IDLE $end
        //      ^^^^^^^^^ - signal_type
        let signal_type = SignalType::from_keyword(&words[0]).ok_or_else(|| {
            VcdError::format(cursor, format!("found unknown signal type `{}`", words[0]))
        })?;

        // $var parameter 3 a IDLE $end
        //                ^ - num_bits
        let num_bits = words[1].parse::<u32>().map_err(|_| {
            VcdError::format(cursor, format!("failed to parse `{}` as a bit width", words[1]))
        })?;

        // $var parameter 3 a IDLE $end
        //                  ^ - id_code
        let id_code = words[2].clone();

        // $var parameter 3 a IDLE $end
        //                    ^^^^ - name (can extend until $end, with an
        //                           optional trailing bit select)
        let mut name = Vec::<&str>::new();
        let mut index = None;
        for word in &words[3..] {
            if word.starts_with('[') {
                index = Some(word.clone());
            } else {
                name.push(word);
            }
        }
        if name.is_empty() {
            return Err(VcdError::format(
                cursor,
                format!("`$var` with identifier code `{id_code}` has no name"),
            ));
        }

        Ok(Token::VarDecl {
            name: name.join(" "),
            signal_type,
            num_bits,
            id_code,
            index,
        })
    }

    fn parse_value_change(&mut self, word: &str) -> Result<Token, VcdError> {
        let cursor = self.token_cursor;
        let mut chars = word.chars();
        let Some(prefix) = chars.next() else {
            return Err(VcdError::format(cursor, "empty value change"));
        };
        let body = chars.as_str();

        // 1-bit signals carry their value and identifier code in one word,
        // i.e. `1!`
        if is_scalar_value(prefix) {
            if body.is_empty() {
                return Err(VcdError::format(
                    cursor,
                    format!("value change `{word}` is missing an identifier code"),
                ));
            }
            return Ok(Token::ValueChange {
                id_code: body.to_string(),
                value: ChangeValue::Scalar(prefix),
            });
        }

        // everything else is written as `b1010 !`, `r1.5 !` or `sfoo !`
        let value = match prefix {
            'b' | 'B' => {
                if body.is_empty() || !body.chars().all(is_scalar_value) {
                    return Err(VcdError::format(
                        cursor,
                        format!("`{word}` is not a valid vector value"),
                    ));
                }
                ChangeValue::Vector(body.to_string())
            }
            'r' | 'R' => {
                if body.parse::<f64>().is_err() {
                    return Err(VcdError::format(
                        cursor,
                        format!("`{word}` is not a valid real value"),
                    ));
                }
                ChangeValue::Real(body.to_string())
            }
            's' | 'S' => ChangeValue::Str(body.to_string()),
            _ => {
                return Err(VcdError::format(
                    cursor,
                    format!("malformed value change `{word}`"),
                ))
            }
        };

        let id_code = match self.word_reader.next_word()? {
            Some((id_code, _)) => id_code,
            None => {
                return Err(VcdError::format(
                    cursor,
                    format!("reached end of file before the identifier code of `{word}`"),
                ))
            }
        };

        Ok(Token::ValueChange { id_code, value })
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = Result<Token, VcdError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input.as_bytes())
            .collect::<Result<Vec<Token>, VcdError>>()
            .unwrap()
    }

    fn first_error(input: &str) -> VcdError {
        tokenize(input.as_bytes())
            .find_map(Result::err)
            .expect("expected the tokenizer to fail")
    }

    #[test]
    fn header_commands() {
        let input = "\
$date
    Mon Feb 22 19:49:29 2021
$end
$version Icarus Verilog $end
$timescale 1ps $end
$comment any $words here $end
";
        assert_eq!(
            tokens(input),
            vec![
                Token::Date("Mon Feb 22 19:49:29 2021".to_string()),
                Token::Version("Icarus Verilog".to_string()),
                Token::Timescale(1, Timescale::Ps),
                Token::Comment("any $words here".to_string()),
            ]
        );
    }

    #[test]
    fn declarations() {
        let input = "\
$scope module testbench $end
$var wire 4 ! foo $end
$var reg 8 %$ data [7:0] $end
$var parameter 32 a my param $end
$upscope $end
$enddefinitions $end
";
        assert_eq!(
            tokens(input),
            vec![
                Token::ScopeBegin {
                    name: "testbench".to_string(),
                    scope_type: ScopeType::Module,
                },
                Token::VarDecl {
                    name: "foo".to_string(),
                    signal_type: SignalType::Wire,
                    num_bits: 4,
                    id_code: "!".to_string(),
                    index: None,
                },
                Token::VarDecl {
                    name: "data".to_string(),
                    signal_type: SignalType::Reg,
                    num_bits: 8,
                    id_code: "%$".to_string(),
                    index: Some("[7:0]".to_string()),
                },
                Token::VarDecl {
                    name: "my param".to_string(),
                    signal_type: SignalType::Parameter,
                    num_bits: 32,
                    id_code: "a".to_string(),
                    index: None,
                },
                Token::ScopeEnd,
                Token::EndDefinitions,
            ]
        );
    }

    #[test]
    fn value_changes() {
        let input = "\
#0
$dumpvars
b0000 !
x\"
$end
#5
b1010 !
1\"
z#a
r3.25 %
sHello %%
B1X0z !
";
        let scalar = |chr, id: &str| Token::ValueChange {
            id_code: id.to_string(),
            value: ChangeValue::Scalar(chr),
        };
        assert_eq!(
            tokens(input),
            vec![
                Token::Time(0),
                Token::SimulationCommand(SimulationCommand::DumpVars),
                Token::ValueChange {
                    id_code: "!".to_string(),
                    value: ChangeValue::Vector("0000".to_string()),
                },
                scalar('x', "\""),
                Token::SimulationCommandEnd,
                Token::Time(5),
                Token::ValueChange {
                    id_code: "!".to_string(),
                    value: ChangeValue::Vector("1010".to_string()),
                },
                scalar('1', "\""),
                scalar('z', "#a"),
                Token::ValueChange {
                    id_code: "%".to_string(),
                    value: ChangeValue::Real("3.25".to_string()),
                },
                Token::ValueChange {
                    id_code: "%%".to_string(),
                    value: ChangeValue::Str("Hello".to_string()),
                },
                Token::ValueChange {
                    id_code: "!".to_string(),
                    value: ChangeValue::Vector("1X0z".to_string()),
                },
            ]
        );
    }

    #[test]
    fn nameless_scope() {
        assert_eq!(
            tokens("$scope begin $end"),
            vec![Token::ScopeBegin {
                name: String::new(),
                scope_type: ScopeType::Begin,
            }]
        );
    }

    #[test]
    fn format_errors() {
        let cases = [
            "$date Mon Feb",
            "$scope module top",
            "$scope blob top $end",
            "$var wire 1 ! $end",
            "$var wirez 1 ! a $end",
            "$var wire one ! a $end",
            "$timescale 7 ns $end",
            "$dumpfile foo $end",
            "$upscope top $end",
            "$end",
            "$dumpvars 1! $dumpall",
            "$dumpvars 1!",
            "#12a",
            "1",
            "b102 !",
            "b",
            "b101",
            "rabc !",
            "q!",
        ];
        for input in cases {
            match first_error(input) {
                VcdError::Format { .. } => {}
                other => panic!("expected a format error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn error_location_and_fusing() {
        let input = "$scope module top $end\n#1\n1!\n  b10x2 !\n0!\n";
        let mut tokenizer = tokenize(input.as_bytes());

        let mut seen = 0;
        let err = loop {
            match tokenizer.next() {
                Some(Ok(_)) => seen += 1,
                Some(Err(err)) => break err,
                None => panic!("expected an error"),
            }
        };
        assert_eq!(seen, 3);
        match err {
            VcdError::Format { cursor, .. } => {
                assert_eq!(cursor, Cursor(crate::Line(4), crate::Word(1)))
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(tokenizer.next().is_none());
    }
}
