/*! Test coverage for the IR core.
 *
 * Emitters built on top of this crate assume the builder keeps its cursor exactly where it says
 * it does, that the skeletons produce well-formed graphs, and that the verifier and interpreter
 * agree with each other. These tests pin those assumptions down one layer at a time.
 */

#![allow(unused_imports)]
#![allow(unused_variables)]

mod analysis_tests;
mod builder_tests;
mod type_tests;
