pub(crate) mod request_router;
