//! PEG grammar for PLY header lines and ASCII vertex values.
//!
//! This module is an internal implementation detail, but [`Line`] surfaces through
//! `Parser::read_header_line`.

use crate::ply::{ PropertyType, ScalarType };

/// A single classified header line.
///
/// Lines are classified by their leading keyword. Anything unrecognised ends up
/// in [`Line::Other`] and is ignored by the header parser.
#[derive(Debug, PartialEq, Clone)]
pub enum Line<'a> {
    /// The `ply` magic number line.
    MagicNumber,
    /// A `format ...` line, holding everything after the keyword.
    Format(&'a str),
    /// A `comment ...` line.
    Comment(&'a str),
    /// An `obj_info ...` line.
    ObjInfo(&'a str),
    /// An `element <name> ... <count>` line; `count` is the last token, not yet validated.
    Element {
        /// Element name.
        name: &'a str,
        /// Trailing count token.
        count: &'a str,
    },
    /// A `property ...` line.
    Property {
        /// Declared type, possibly unsupported.
        data_type: PropertyType,
        /// Property name.
        name: &'a str,
    },
    /// A line starting with `element` or `property` that lacks required tokens.
    Malformed(&'a str),
    /// The `end_header` terminator line.
    EndHeader,
    /// Anything else.
    Other(&'a str),
}

peg::parser!{pub grammar grammar() for str {

rule space() = [' '|'\t']+

rule token() -> &'input str
	= s:$((![' '|'\t'|'\r'|'\n'][_])+) { s }

rule text() -> &'input str
	= s:$([_]*) { s }

rule scalar() -> ScalarType
	= "char"    { ScalarType::Char }
	/ "int8"    { ScalarType::Char }
	/ "uchar"   { ScalarType::UChar }
	/ "uint8"   { ScalarType::UChar }
	/ "short"   { ScalarType::Short }
	/ "int16"   { ScalarType::Short }
	/ "uint16"  { ScalarType::UShort }
	/ "ushort"  { ScalarType::UShort }
	/ "int32"   { ScalarType::Int }
	/ "int"     { ScalarType::Int }
	/ "uint32"  { ScalarType::UInt }
	/ "uint"    { ScalarType::UInt }
	/ "float32" { ScalarType::Float }
	/ "float64" { ScalarType::Double }
	/ "float"   { ScalarType::Float }
	/ "double"  { ScalarType::Double }

rule data_type() -> PropertyType
	= "list" space() i:scalar() &space() space() t:scalar() &space() {?
		if i.is_integer() { Ok(PropertyType::List(i, t)) } else { Err("integer list index type") }
	}
	/ "list" space() i:token() space() t:token() &space() {
		PropertyType::Unsupported(format!("list {} {}", i, t))
	}
	/ s:scalar() &space() { PropertyType::Scalar(s) }
	/ t:token() { PropertyType::Unsupported(t.to_string()) }

/// Non-negative base-10 integer.
pub rule count() -> usize
	= n:$(['0'..='9']+) ![_] {? n.parse().or(Err("count fitting usize")) }

/// Finite decimal number, independent of locale.
pub rule number() -> f64
	= s:$(['-'|'+']? (['0'..='9']+ ("." ['0'..='9']*)? / "." ['0'..='9']+) (['e'|'E'] ['-'|'+']? ['0'..='9']+)?) ![_] {?
		match s.parse::<f64>() {
			Ok(v) if v.is_finite() => Ok(v),
			_ => Err("finite decimal number"),
		}
	}

pub rule element() -> (&'input str, &'input str)
	= "element" space() n:token() c:(space() t:token() { t })+ space()? {
		(n, c[c.len() - 1])
	}

pub rule property() -> (PropertyType, &'input str)
	= "property" space() d:data_type() space() n:token() text() { (d, n) }

pub rule line() -> Line<'input>
	= "ply" space()? ![_] { Line::MagicNumber }
	/ "end_header" ![_] { Line::EndHeader }
	/ "format" r:text() { Line::Format(r) }
	/ "comment" r:text() { Line::Comment(r.trim()) }
	/ "obj_info" r:text() { Line::ObjInfo(r.trim()) }
	/ e:element() { Line::Element { name: e.0, count: e.1 } }
	/ "element" r:text() { Line::Malformed(r) }
	/ p:property() { Line::Property { data_type: p.0, name: p.1 } }
	/ "property" r:text() { Line::Malformed(r) }
	/ r:text() { Line::Other(r) }

}}
