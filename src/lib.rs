pub mod config;
pub mod error;
pub mod evaluator;
pub mod expr;
pub mod grpc;
pub mod node;
pub mod scheduler;
pub mod service;
pub mod shutdown;
pub mod worker;

/// Wire types for the `abacus.Agent` service.
pub mod proto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ExpressionRequest {
        /// Caller-chosen request identifier, echoed back in the result
        #[prost(string, tag = "1")]
        pub id: ::prost::alloc::string::String,
        #[prost(string, tag = "2")]
        pub expression: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ExpressionResult {
        #[prost(string, tag = "1")]
        pub id: ::prost::alloc::string::String,
        /// Fixed-point rendering of the computed value
        #[prost(string, tag = "2")]
        pub result: ::prost::alloc::string::String,
    }

    include!(concat!(env!("OUT_DIR"), "/abacus.Agent.rs"));
}
