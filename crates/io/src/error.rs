use std::fmt;

#[derive(Debug)]
pub enum IoError {
    /// The input workbook could not be opened or parsed.
    Read(String),
    /// The annotated workbook could not be written.
    Write(String),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Read(msg) => write!(f, "falha ao ler a planilha: {msg}"),
            IoError::Write(msg) => write!(f, "falha ao gravar a planilha: {msg}"),
        }
    }
}

impl std::error::Error for IoError {}
