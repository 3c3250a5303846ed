//! Generated jamroot.jam descriptor statements
//!
//! The textual shape of these statements is a compatibility surface for the
//! external build tool and is reproduced byte-for-byte.

/// Root/registration block declaring a header-only project rooted three
/// directory levels above the descriptor file.
pub fn header_only_root(lib_short_name: &str) -> String {
    format!(
        "import project ;\n\
         import path ;\n\
         import modules ;\n\
         ROOT({0}) = [ path.parent [ path.parent [ path.make [ modules.binding $(__name__) ] ] ] ] ;\n\
         project /conan/{0} : requirements <include>$(ROOT({0}))/include ;\n\
         project.register-id /boost/{0} : $(__name__) ;",
        lib_short_name
    )
}

/// Search declaration for one discovered library artifact
pub fn search_lib(lib_link_name: &str) -> String {
    format!("lib {0} : : <name>{0} <search>. : : $(usage) ;\n", lib_link_name)
}

/// Alias mapping the canonical `boost_<name>` to the discovered artifacts
pub fn alias(lib_short_name: &str, libs: &[String]) -> String {
    format!(
        "alias boost_{} : {} : : : $(usage) ;\n",
        lib_short_name,
        libs.join(" ")
    )
}
