//! Handler trait and utilities

use crate::error::ApiError;
use crate::extract::FromRequest;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Trait representing an async handler function
///
/// Implemented for async functions taking up to four extractors. Every
/// argument is extracted, left to right. Validation failures from all of
/// them are merged into one 422; any other failure becomes the response.
pub trait Handler<T>: Clone + Send + Sync + Sized + 'static {
    /// The response future
    type Future: Future<Output = Response> + Send + 'static;

    /// Call the handler with the request
    fn call(self, req: Request) -> Self::Future;
}

// 0 args
impl<F, Fut, Res> Handler<()> for F
where
    F: FnOnce() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
    Res: IntoResponse,
{
    type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

    fn call(self, _req: Request) -> Self::Future {
        Box::pin(async move { self().await.into_response() })
    }
}

macro_rules! impl_handler {
    ($($ty:ident),+) => {
        impl<F, Fut, Res, $($ty,)+> Handler<($($ty,)+)> for F
        where
            F: FnOnce($($ty,)+) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send + 'static,
            Res: IntoResponse,
            $($ty: FromRequest + Send + 'static,)+
        {
            type Future = Pin<Box<dyn Future<Output = Response> + Send>>;

            #[allow(non_snake_case)]
            fn call(self, mut req: Request) -> Self::Future {
                let mut rejections = Vec::new();
                $(
                    let $ty = match $ty::from_request(&mut req) {
                        Ok(v) => Some(v),
                        Err(e) => {
                            rejections.push(e);
                            None
                        }
                    };
                )+
                if let Some(err) = ApiError::merge(rejections) {
                    return Box::pin(async move { err.into_response() });
                }
                match ($($ty,)+) {
                    ($(Some($ty),)+) => Box::pin(async move { self($($ty,)+).await.into_response() }),
                    _ => Box::pin(async { ApiError::internal("Extractor produced no value").into_response() }),
                }
            }
        }
    };
}

impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);

// Type-erased handler for storage in router
pub(crate) type BoxedHandler =
    Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Create a boxed handler from any Handler
pub(crate) fn into_boxed_handler<H, T>(handler: H) -> BoxedHandler
where
    H: Handler<T>,
    T: 'static,
{
    Arc::new(move |req| {
        let handler = handler.clone();
        Box::pin(async move { handler.call(req).await })
    })
}
