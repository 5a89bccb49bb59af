//! Typed views over the string parameters of each operation
//!
//! The wire format stays a string map; each record is parsed into one of these
//! structs when it is compiled. Every missing or invalid field surfaces as a
//! configuration error.

use super::Params;
use crate::calculation::CalculationMethod;
use crate::compression::CompressionType;
use crate::encryption::EncryptionType;
use crate::exceptions::{FileprocError, Result};
use std::path::PathBuf;
use std::str::FromStr;

pub const PARAM_TYPE: &str = "type";
pub const PARAM_KEY_FILE: &str = "key_file";

fn required<'a>(params: &'a Params, operation: &str, key: &str) -> Result<&'a str> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            FileprocError::Config(format!(
                "operation '{operation}' requires parameter '{key}'"
            ))
        })
}

fn parsed<T>(params: &Params, operation: &str, key: &str) -> Result<T>
where
    T: FromStr<Err = FileprocError>,
{
    required(params, operation, key)?.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionParams {
    pub kind: CompressionType,
}

impl CompressionParams {
    pub fn parse(operation: &str, params: &Params) -> Result<Self> {
        Ok(CompressionParams {
            kind: parsed(params, operation, PARAM_TYPE)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub kind: EncryptionType,
    pub key_file: PathBuf,
}

impl CipherParams {
    pub fn parse(operation: &str, params: &Params) -> Result<Self> {
        Ok(CipherParams {
            kind: parsed(params, operation, PARAM_TYPE)?,
            key_file: PathBuf::from(required(params, operation, PARAM_KEY_FILE)?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationParams {
    pub method: CalculationMethod,
}

impl CalculationParams {
    pub fn parse(operation: &str, params: &Params) -> Result<Self> {
        Ok(CalculationParams {
            method: parsed(params, operation, PARAM_TYPE)?,
        })
    }
}
