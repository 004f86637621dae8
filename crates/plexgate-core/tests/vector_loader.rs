//! JSON test vector loader shared by codec tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TestVector {
    pub description: String,
    pub frame: FrameData,
    #[serde(default)]
    pub expect: Option<serde_json::Value>,
    #[serde(default)]
    pub expect_error: Option<ExpectError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectError {
    pub code: String,
}

/// An HTTP body as the caller would post it.
#[derive(Debug, Deserialize)]
pub struct FrameData {
    /// `hex` for well-formed transport text, `text` for arbitrary text.
    pub encoding: String,
    pub data: String,
}

impl FrameData {
    /// Body bytes exactly as posted.
    pub fn body(&self) -> Vec<u8> {
        self.data.as_bytes().to_vec()
    }

    /// Protobuf bytes wrapped by a `hex` frame.
    pub fn raw(&self) -> Option<Vec<u8>> {
        match self.encoding.as_str() {
            "hex" => Some(hex::decode(&self.data).expect("invalid hex in test vector")),
            "text" => None,
            other => panic!("unsupported encoding: {other}"),
        }
    }
}

pub fn load(name: &str) -> TestVector {
    let s = std::fs::read_to_string(format!("tests/vectors/{name}")).unwrap();
    serde_json::from_str(&s).unwrap()
}
