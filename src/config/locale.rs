//! User-facing messages in the two supported languages

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Language used for messages and the default destination folder
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Portuguese (`arquivos_<ext>`)
    #[default]
    Pt,
    /// English (`files_<ext>`)
    En,
}

impl Locale {
    /// Prefix of the default destination folder name
    pub fn destination_prefix(&self) -> &'static str {
        match self {
            Self::Pt => "arquivos_",
            Self::En => "files_",
        }
    }

    /// Shown when the walk finds nothing to copy
    pub fn no_files_found(&self) -> &'static str {
        match self {
            Self::Pt => "Nenhum arquivo encontrado com a extensão especificada.",
            Self::En => "No files found with the specified extension.",
        }
    }

    /// Shown when the source or extension is missing or invalid
    pub fn missing_input(&self) -> &'static str {
        match self {
            Self::Pt => "Por favor, selecione um diretório e especifique uma extensão de arquivo.",
            Self::En => "Please select a directory and specify a file extension.",
        }
    }

    /// Final counters line
    pub fn summary(&self, copied: u64, identical: u64, errors: u64) -> String {
        match self {
            Self::Pt => format!("Copiados: {copied}, Idênticos: {identical}, Erros: {errors}"),
            Self::En => format!("Copied: {copied}, Identical: {identical}, Errors: {errors}"),
        }
    }

    /// Log line for a finished copy
    pub fn file_copied(&self, name: impl Display, dest: impl Display) -> String {
        match self {
            Self::Pt => format!("Arquivo {name} copiado para {dest}."),
            Self::En => format!("File {name} copied to {dest}."),
        }
    }

    /// Log line for a file skipped because its content is already there
    pub fn file_identical(&self, name: impl Display, dest: impl Display) -> String {
        match self {
            Self::Pt => format!("Arquivo {name} idêntico a {dest}, ignorado."),
            Self::En => format!("File {name} identical to {dest}, skipped."),
        }
    }

    /// Log line for a failed copy
    pub fn copy_failed(&self, name: impl Display, error: impl Display) -> String {
        match self {
            Self::Pt => format!("Erro ao copiar o arquivo {name}: {error}"),
            Self::En => format!("Error copying file {name}: {error}"),
        }
    }

    /// Log line for a name that ran out of rename attempts
    pub fn rename_limit_reached(&self, base: impl Display) -> String {
        match self {
            Self::Pt => format!("Limite de renomeação atingido para arquivos com base {base}."),
            Self::En => format!("Rename limit reached for files with base {base}."),
        }
    }

    /// Log line when the destination folder cannot be created
    pub fn destination_failed(&self, dest: impl Display, error: impl Display) -> String {
        match self {
            Self::Pt => format!("Erro ao criar a pasta de destino {dest}: {error}"),
            Self::En => format!("Error creating destination folder {dest}: {error}"),
        }
    }
}
