pub mod shared {
    pub mod infrastructure {
        pub mod object_store;
    }
}

pub mod modules {
    pub mod event_log {
        pub mod core {
            pub mod document;
            pub mod events;
            pub mod identity;
            pub mod payload;
            pub mod routing;
        }
        pub mod use_cases {
            pub mod append_events {
                pub mod command;
                pub mod handler;
                pub mod response;
                pub mod inbound {
                    pub mod gateway;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod log_document;
            }
        }
    }
}

pub mod shell;
