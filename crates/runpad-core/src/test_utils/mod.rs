pub mod mock_engine_server;
