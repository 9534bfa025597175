// ------- Shared --------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoServerFault {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoBlockRef {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub location: ::prost::alloc::string::String,
}
// ------- RequestVote --------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequestVoteReq {
    #[prost(string, tag = "1")]
    pub client_node_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub term: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequestVoteResult {
    #[prost(oneof = "proto_request_vote_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_request_vote_result::Result>,
}
/// Nested message and enum types in `ProtoRequestVoteResult`.
pub mod proto_request_vote_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoRequestVoteSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoRequestVoteError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequestVoteSuccess {
    #[prost(bool, tag = "1")]
    pub vote_granted: bool,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoRequestVoteError {
    #[prost(oneof = "proto_request_vote_error::Err", tags = "1")]
    pub err: ::core::option::Option<proto_request_vote_error::Err>,
}
/// Nested message and enum types in `ProtoRequestVoteError`.
pub mod proto_request_vote_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        ServerFault(super::ProtoServerFault),
    }
}
// ------- AppendEntry (heartbeat) --------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAppendEntryReq {
    #[prost(string, tag = "1")]
    pub client_node_id: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub term: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAppendEntryResult {
    #[prost(oneof = "proto_append_entry_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_append_entry_result::Result>,
}
/// Nested message and enum types in `ProtoAppendEntryResult`.
pub mod proto_append_entry_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoAppendEntrySuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoAppendEntryError),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAppendEntrySuccess {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoAppendEntryError {
    #[prost(oneof = "proto_append_entry_error::Err", tags = "1, 2, 3")]
    pub err: ::core::option::Option<proto_append_entry_error::Err>,
}
/// Nested message and enum types in `ProtoAppendEntryError`.
pub mod proto_append_entry_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        ServerFault(super::ProtoServerFault),
        #[prost(message, tag = "2")]
        StaleTerm(super::ProtoClientStaleTerm),
        #[prost(message, tag = "3")]
        ClientNotInCluster(super::ProtoClientNotInCluster),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoClientStaleTerm {
    #[prost(uint64, tag = "1")]
    pub current_term: u64,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoClientNotInCluster {}
// ------- Leader discovery --------

/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoWhoIsLeaderReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoWhoIsLeaderResult {
    /// Empty string means no known leader.
    #[prost(string, tag = "1")]
    pub leader_id: ::prost::alloc::string::String,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoIsLeaderReq {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoIsLeaderResult {
    #[prost(bool, tag = "1")]
    pub is_leader: bool,
}
// ------- Versioning protocol --------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoReadFileReq {
    #[prost(string, tag = "1")]
    pub filename: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoReadFileResult {
    #[prost(uint64, tag = "1")]
    pub version: u64,
    #[prost(message, repeated, tag = "2")]
    pub hashlist: ::prost::alloc::vec::Vec<ProtoBlockRef>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoModifyFileReq {
    #[prost(string, tag = "1")]
    pub filename: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub version: u64,
    #[prost(message, repeated, tag = "3")]
    pub hashlist: ::prost::alloc::vec::Vec<ProtoBlockRef>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoModifyFileResult {
    #[prost(oneof = "proto_modify_file_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_modify_file_result::Result>,
}
/// Nested message and enum types in `ProtoModifyFileResult`.
pub mod proto_modify_file_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoFileOpSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoFileError),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDeleteFileReq {
    #[prost(string, tag = "1")]
    pub filename: ::prost::alloc::string::String,
    #[prost(uint64, tag = "2")]
    pub version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoDeleteFileResult {
    #[prost(oneof = "proto_delete_file_result::Result", tags = "1, 2")]
    pub result: ::core::option::Option<proto_delete_file_result::Result>,
}
/// Nested message and enum types in `ProtoDeleteFileResult`.
pub mod proto_delete_file_result {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        #[prost(message, tag = "1")]
        Ok(super::ProtoFileOpSuccess),
        #[prost(message, tag = "2")]
        Err(super::ProtoFileError),
    }
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoFileOpSuccess {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoFileError {
    #[prost(oneof = "proto_file_error::Err", tags = "1, 2, 3, 4, 5")]
    pub err: ::core::option::Option<proto_file_error::Err>,
}
/// Nested message and enum types in `ProtoFileError`.
pub mod proto_file_error {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Err {
        #[prost(message, tag = "1")]
        WrongVersion(super::ProtoWrongVersion),
        #[prost(message, tag = "2")]
        MissingBlocks(super::ProtoMissingBlocks),
        #[prost(message, tag = "3")]
        FileNotFound(super::ProtoFileNotFound),
        #[prost(message, tag = "4")]
        NotLeader(super::ProtoNotLeader),
        #[prost(message, tag = "5")]
        ServerFault(super::ProtoServerFault),
    }
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoWrongVersion {
    #[prost(uint64, tag = "1")]
    pub current_version: u64,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoMissingBlocks {
    #[prost(string, repeated, tag = "1")]
    pub hashes: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoFileNotFound {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoNotLeader {
    /// Empty string means no known leader.
    #[prost(string, tag = "1")]
    pub leader_id: ::prost::alloc::string::String,
}
// ------- Block store --------

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStoreBlockReq {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}
/// Empty
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoStoreBlockResult {}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetBlockReq {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoGetBlockResult {
    #[prost(bool, tag = "1")]
    pub found: bool,
    #[prost(bytes = "vec", tag = "2")]
    pub data: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoHasBlockReq {
    #[prost(string, tag = "1")]
    pub hash: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ProtoHasBlockResult {
    #[prost(bool, tag = "1")]
    pub present: bool,
}
#[doc = r" Generated client implementations."]
pub mod grpc_meta_store_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Served by every metadata replica. The first two RPCs are replica-to-replica, the rest are"]
    #[doc = " for clients."]
    pub struct GrpcMetaStoreClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcMetaStoreClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcMetaStoreClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn request_vote(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoRequestVoteReq>,
        ) -> Result<tonic::Response<super::ProtoRequestVoteResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/RequestVote");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn append_entry(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoAppendEntryReq>,
        ) -> Result<tonic::Response<super::ProtoAppendEntryResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/AppendEntry");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn who_is_leader(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoWhoIsLeaderReq>,
        ) -> Result<tonic::Response<super::ProtoWhoIsLeaderResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/WhoIsLeader");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn is_leader(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoIsLeaderReq>,
        ) -> Result<tonic::Response<super::ProtoIsLeaderResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/IsLeader");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn read_file(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoReadFileReq>,
        ) -> Result<tonic::Response<super::ProtoReadFileResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/ReadFile");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn modify_file(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoModifyFileReq>,
        ) -> Result<tonic::Response<super::ProtoModifyFileResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/ModifyFile");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn delete_file(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoDeleteFileReq>,
        ) -> Result<tonic::Response<super::ProtoDeleteFileResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcMetaStore/DeleteFile");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcMetaStoreClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcMetaStoreClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcMetaStoreClient {{ ... }}")
        }
    }
}
#[doc = r" Generated client implementations."]
pub mod grpc_block_store_client {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = " Served by every block store shard."]
    pub struct GrpcBlockStoreClient<T> {
        inner: tonic::client::Grpc<T>,
    }
    impl GrpcBlockStoreClient<tonic::transport::Channel> {
        #[doc = r" Attempt to create a new client by connecting to a given endpoint."]
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: std::convert::TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }
    impl<T> GrpcBlockStoreClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::ResponseBody: Body + HttpBody + Send + 'static,
        T::Error: Into<StdError>,
        <T::ResponseBody as HttpBody>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = tonic::client::Grpc::with_interceptor(inner, interceptor);
            Self { inner }
        }
        pub async fn store_block(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoStoreBlockReq>,
        ) -> Result<tonic::Response<super::ProtoStoreBlockResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcBlockStore/StoreBlock");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn get_block(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoGetBlockReq>,
        ) -> Result<tonic::Response<super::ProtoGetBlockResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcBlockStore/GetBlock");
            self.inner.unary(request.into_request(), path, codec).await
        }
        pub async fn has_block(
            &mut self,
            request: impl tonic::IntoRequest<super::ProtoHasBlockReq>,
        ) -> Result<tonic::Response<super::ProtoHasBlockResult>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::new(
                    tonic::Code::Unknown,
                    format!("Service was not ready: {}", e.into()),
                )
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static("/metastore.GrpcBlockStore/HasBlock");
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
    impl<T: Clone> Clone for GrpcBlockStoreClient<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }
    impl<T> std::fmt::Debug for GrpcBlockStoreClient<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "GrpcBlockStoreClient {{ ... }}")
        }
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_meta_store_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcMetaStoreServer."]
    #[async_trait]
    pub trait GrpcMetaStore: Send + Sync + 'static {
        async fn request_vote(
            &self,
            request: tonic::Request<super::ProtoRequestVoteReq>,
        ) -> Result<tonic::Response<super::ProtoRequestVoteResult>, tonic::Status>;
        async fn append_entry(
            &self,
            request: tonic::Request<super::ProtoAppendEntryReq>,
        ) -> Result<tonic::Response<super::ProtoAppendEntryResult>, tonic::Status>;
        async fn who_is_leader(
            &self,
            request: tonic::Request<super::ProtoWhoIsLeaderReq>,
        ) -> Result<tonic::Response<super::ProtoWhoIsLeaderResult>, tonic::Status>;
        async fn is_leader(
            &self,
            request: tonic::Request<super::ProtoIsLeaderReq>,
        ) -> Result<tonic::Response<super::ProtoIsLeaderResult>, tonic::Status>;
        async fn read_file(
            &self,
            request: tonic::Request<super::ProtoReadFileReq>,
        ) -> Result<tonic::Response<super::ProtoReadFileResult>, tonic::Status>;
        async fn modify_file(
            &self,
            request: tonic::Request<super::ProtoModifyFileReq>,
        ) -> Result<tonic::Response<super::ProtoModifyFileResult>, tonic::Status>;
        async fn delete_file(
            &self,
            request: tonic::Request<super::ProtoDeleteFileReq>,
        ) -> Result<tonic::Response<super::ProtoDeleteFileResult>, tonic::Status>;
    }
    #[doc = " Served by every metadata replica. The first two RPCs are replica-to-replica, the rest are"]
    #[doc = " for clients."]
    #[derive(Debug)]
    pub struct GrpcMetaStoreServer<T: GrpcMetaStore> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcMetaStore> GrpcMetaStoreServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcMetaStoreServer<T>
    where
        T: GrpcMetaStore,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/metastore.GrpcMetaStore/RequestVote" => {
                    #[allow(non_camel_case_types)]
                    struct RequestVoteSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoRequestVoteReq>
                        for RequestVoteSvc<T>
                    {
                        type Response = super::ProtoRequestVoteResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoRequestVoteReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).request_vote(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = RequestVoteSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/AppendEntry" => {
                    #[allow(non_camel_case_types)]
                    struct AppendEntrySvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoAppendEntryReq>
                        for AppendEntrySvc<T>
                    {
                        type Response = super::ProtoAppendEntryResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoAppendEntryReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).append_entry(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = AppendEntrySvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/WhoIsLeader" => {
                    #[allow(non_camel_case_types)]
                    struct WhoIsLeaderSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoWhoIsLeaderReq>
                        for WhoIsLeaderSvc<T>
                    {
                        type Response = super::ProtoWhoIsLeaderResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoWhoIsLeaderReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).who_is_leader(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = WhoIsLeaderSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/IsLeader" => {
                    #[allow(non_camel_case_types)]
                    struct IsLeaderSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoIsLeaderReq> for IsLeaderSvc<T> {
                        type Response = super::ProtoIsLeaderResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoIsLeaderReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).is_leader(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = IsLeaderSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/ReadFile" => {
                    #[allow(non_camel_case_types)]
                    struct ReadFileSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoReadFileReq> for ReadFileSvc<T> {
                        type Response = super::ProtoReadFileResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoReadFileReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).read_file(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ReadFileSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/ModifyFile" => {
                    #[allow(non_camel_case_types)]
                    struct ModifyFileSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoModifyFileReq> for ModifyFileSvc<T> {
                        type Response = super::ProtoModifyFileResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoModifyFileReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).modify_file(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = ModifyFileSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcMetaStore/DeleteFile" => {
                    #[allow(non_camel_case_types)]
                    struct DeleteFileSvc<T: GrpcMetaStore>(pub Arc<T>);
                    impl<T: GrpcMetaStore> tonic::server::UnaryService<super::ProtoDeleteFileReq> for DeleteFileSvc<T> {
                        type Response = super::ProtoDeleteFileResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoDeleteFileReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).delete_file(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = DeleteFileSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcMetaStore> Clone for GrpcMetaStoreServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcMetaStore> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcMetaStore> tonic::transport::NamedService for GrpcMetaStoreServer<T> {
        const NAME: &'static str = "metastore.GrpcMetaStore";
    }
}
#[doc = r" Generated server implementations."]
pub mod grpc_block_store_server {
    #![allow(unused_variables, dead_code, missing_docs)]
    use tonic::codegen::*;
    #[doc = "Generated trait containing gRPC methods that should be implemented for use with GrpcBlockStoreServer."]
    #[async_trait]
    pub trait GrpcBlockStore: Send + Sync + 'static {
        async fn store_block(
            &self,
            request: tonic::Request<super::ProtoStoreBlockReq>,
        ) -> Result<tonic::Response<super::ProtoStoreBlockResult>, tonic::Status>;
        async fn get_block(
            &self,
            request: tonic::Request<super::ProtoGetBlockReq>,
        ) -> Result<tonic::Response<super::ProtoGetBlockResult>, tonic::Status>;
        async fn has_block(
            &self,
            request: tonic::Request<super::ProtoHasBlockReq>,
        ) -> Result<tonic::Response<super::ProtoHasBlockResult>, tonic::Status>;
    }
    #[doc = " Served by every block store shard."]
    #[derive(Debug)]
    pub struct GrpcBlockStoreServer<T: GrpcBlockStore> {
        inner: _Inner<T>,
    }
    struct _Inner<T>(Arc<T>, Option<tonic::Interceptor>);
    impl<T: GrpcBlockStore> GrpcBlockStoreServer<T> {
        pub fn new(inner: T) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, None);
            Self { inner }
        }
        pub fn with_interceptor(inner: T, interceptor: impl Into<tonic::Interceptor>) -> Self {
            let inner = Arc::new(inner);
            let inner = _Inner(inner, Some(interceptor.into()));
            Self { inner }
        }
    }
    impl<T, B> Service<http::Request<B>> for GrpcBlockStoreServer<T>
    where
        T: GrpcBlockStore,
        B: HttpBody + Send + Sync + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = Never;
        type Future = BoxFuture<Self::Response, Self::Error>;
        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            let inner = self.inner.clone();
            match req.uri().path() {
                "/metastore.GrpcBlockStore/StoreBlock" => {
                    #[allow(non_camel_case_types)]
                    struct StoreBlockSvc<T: GrpcBlockStore>(pub Arc<T>);
                    impl<T: GrpcBlockStore> tonic::server::UnaryService<super::ProtoStoreBlockReq>
                        for StoreBlockSvc<T>
                    {
                        type Response = super::ProtoStoreBlockResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoStoreBlockReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).store_block(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = StoreBlockSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcBlockStore/GetBlock" => {
                    #[allow(non_camel_case_types)]
                    struct GetBlockSvc<T: GrpcBlockStore>(pub Arc<T>);
                    impl<T: GrpcBlockStore> tonic::server::UnaryService<super::ProtoGetBlockReq> for GetBlockSvc<T> {
                        type Response = super::ProtoGetBlockResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoGetBlockReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).get_block(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = GetBlockSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                "/metastore.GrpcBlockStore/HasBlock" => {
                    #[allow(non_camel_case_types)]
                    struct HasBlockSvc<T: GrpcBlockStore>(pub Arc<T>);
                    impl<T: GrpcBlockStore> tonic::server::UnaryService<super::ProtoHasBlockReq> for HasBlockSvc<T> {
                        type Response = super::ProtoHasBlockResult;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;
                        fn call(
                            &mut self,
                            request: tonic::Request<super::ProtoHasBlockReq>,
                        ) -> Self::Future {
                            let inner = self.0.clone();
                            let fut = async move { (*inner).has_block(request).await };
                            Box::pin(fut)
                        }
                    }
                    let inner = self.inner.clone();
                    let fut = async move {
                        let interceptor = inner.1.clone();
                        let inner = inner.0;
                        let method = HasBlockSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = if let Some(interceptor) = interceptor {
                            tonic::server::Grpc::with_interceptor(codec, interceptor)
                        } else {
                            tonic::server::Grpc::new(codec)
                        };
                        let res = grpc.unary(method, req).await;
                        Ok(res)
                    };
                    Box::pin(fut)
                }
                _ => Box::pin(async move {
                    Ok(http::Response::builder()
                        .status(200)
                        .header("grpc-status", "12")
                        .header("content-type", "application/grpc")
                        .body(tonic::body::BoxBody::empty())
                        .unwrap())
                }),
            }
        }
    }
    impl<T: GrpcBlockStore> Clone for GrpcBlockStoreServer<T> {
        fn clone(&self) -> Self {
            let inner = self.inner.clone();
            Self { inner }
        }
    }
    impl<T: GrpcBlockStore> Clone for _Inner<T> {
        fn clone(&self) -> Self {
            Self(self.0.clone(), self.1.clone())
        }
    }
    impl<T: std::fmt::Debug> std::fmt::Debug for _Inner<T> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }
    impl<T: GrpcBlockStore> tonic::transport::NamedService for GrpcBlockStoreServer<T> {
        const NAME: &'static str = "metastore.GrpcBlockStore";
    }
}
