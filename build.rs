fn main() {
    // Only run gRPC codegen when the "grpc" feature is enabled.
    // Cargo sets CARGO_FEATURE_GRPC when compiling with --features grpc.
    if std::env::var("CARGO_FEATURE_GRPC").is_ok() {
        let method = |name: &str, route: &str, input: &str, output: &str| {
            tonic_build::manual::Method::builder()
                .name(name)
                .route_name(route)
                .input_type(format!("crate::grpc::{input}"))
                .output_type(format!("crate::grpc::{output}"))
                .codec_path("tonic::codec::ProstCodec")
                .build()
        };

        let service = tonic_build::manual::Service::builder()
            .name("UfoService")
            .package("ufo.v1")
            .method(method("create", "Create", "CreateRequest", "CreateResponse"))
            .method(method("get", "Get", "GetRequest", "GetResponse"))
            .method(method("get_all", "GetAll", "GetAllRequest", "GetAllResponse"))
            .method(method("update", "Update", "UpdateRequest", "Empty"))
            .method(method("delete", "Delete", "DeleteRequest", "Empty"))
            .build();

        tonic_build::manual::Builder::new().compile(&[service]);
    }
}
