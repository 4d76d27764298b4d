//! Command line front end for [`sc_compression`].

pub mod commands;
