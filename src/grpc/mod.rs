pub mod agent_service;
pub mod server;

pub use agent_service::AgentService;
pub use server::GrpcServer;
