/// Cross-module test suites for the Kyber NTT
///
/// Test Organization:
/// - Algebraic properties of the transform checked against a naive reference
/// - Known-answer vectors reproduced bit for bit
/// - End-to-end runs through the harness and its file formats
