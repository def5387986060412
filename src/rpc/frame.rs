//! Protobuf messages exchanged with the function invoker.
//!
//! These mirror the `streaming` proto package served by the invoker:
//!
//! ```text
//! InputSignal  { oneof frame { StartFrame start = 1; InputFrame data = 2; } }
//! OutputSignal { oneof frame { OutputFrame data = 1; } }
//! ```
//!
//! An invocation always opens with exactly one `StartFrame`, followed by the
//! input data frames. The invoker answers with output frames until it closes
//! the stream.

use std::collections::HashMap;

/// Name of the single input declared in every start frame.
pub const INPUT_NAME: &str = "in";

/// Name of the single output declared in every start frame.
pub const OUTPUT_NAME: &str = "out";

/// Negotiation contract for one invocation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StartFrame {
    /// Acceptable content types for the outputs, in order.
    #[prost(string, repeated, tag = "1")]
    pub expected_content_types: Vec<String>,
    #[prost(string, repeated, tag = "2")]
    pub input_names: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub output_names: Vec<String>,
}

impl StartFrame {
    /// Start frame declaring the adapter's single `in` / `out` pair.
    pub fn new(expected_content_types: Vec<String>) -> Self {
        Self {
            expected_content_types,
            input_names: vec![INPUT_NAME.to_string()],
            output_names: vec![OUTPUT_NAME.to_string()],
        }
    }
}

/// One logical input payload plus its metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputFrame {
    #[prost(bytes = "vec", tag = "1")]
    pub payload: Vec<u8>,
    #[prost(string, tag = "2")]
    pub content_type: String,
    #[prost(map = "string, string", tag = "3")]
    pub headers: HashMap<String, String>,
    /// Index into `StartFrame::input_names`.
    #[prost(int32, tag = "4")]
    pub arg_index: i32,
}

/// One logical output payload plus its metadata.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutputFrame {
    #[prost(bytes = "vec", tag = "1")]
    pub payload: Vec<u8>,
    #[prost(string, tag = "2")]
    pub content_type: String,
    #[prost(map = "string, string", tag = "3")]
    pub headers: HashMap<String, String>,
    /// Index into `StartFrame::output_names`.
    #[prost(int32, tag = "4")]
    pub result_index: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputSignal {
    #[prost(oneof = "input_signal::Frame", tags = "1, 2")]
    pub frame: Option<input_signal::Frame>,
}

pub mod input_signal {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Frame {
        #[prost(message, tag = "1")]
        Start(super::StartFrame),
        #[prost(message, tag = "2")]
        Data(super::InputFrame),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutputSignal {
    #[prost(oneof = "output_signal::Frame", tags = "1")]
    pub frame: Option<output_signal::Frame>,
}

pub mod output_signal {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Frame {
        #[prost(message, tag = "1")]
        Data(super::OutputFrame),
    }
}

impl InputSignal {
    pub fn start(frame: StartFrame) -> Self {
        Self {
            frame: Some(input_signal::Frame::Start(frame)),
        }
    }

    pub fn data(frame: InputFrame) -> Self {
        Self {
            frame: Some(input_signal::Frame::Data(frame)),
        }
    }

    pub fn as_start(&self) -> Option<&StartFrame> {
        match &self.frame {
            Some(input_signal::Frame::Start(start)) => Some(start),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&InputFrame> {
        match &self.frame {
            Some(input_signal::Frame::Data(data)) => Some(data),
            _ => None,
        }
    }
}

impl OutputSignal {
    pub fn data(frame: OutputFrame) -> Self {
        Self {
            frame: Some(output_signal::Frame::Data(frame)),
        }
    }
}
