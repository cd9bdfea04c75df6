//! gRPC layer.

mod hr_grpc;

pub use hr_grpc::HrGrpcService;
