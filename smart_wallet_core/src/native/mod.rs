// Native implementations

pub mod rpc_impl;

pub use rpc_impl::NativeRpcClient;
