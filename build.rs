use tonic_build::manual::{Builder, Method, Service};

fn main() {
    let agent = Service::builder()
        .name("Agent")
        .package("abacus")
        .comment("Evaluates arithmetic expressions on the worker pool")
        .method(
            Method::builder()
                .name("send_expression")
                .route_name("SendExpression")
                .comment("Evaluate one expression and wait for its result")
                .input_type("crate::proto::ExpressionRequest")
                .output_type("crate::proto::ExpressionResult")
                .codec_path("tonic::codec::ProstCodec")
                .build(),
        )
        .build();

    Builder::new().compile(&[agent]);
}
