use std::os::raw::c_char;
use std::ffi::CStr;
use std::ops::Deref;

use ndarray::ArrayView3;

use b2_descriptor::{B2Calculator, Error, SingleBond, Vector3D, B2};

use super::utils::copy_str_to_c;
use super::{catch_unwind, b2_status_t};

/// Opaque type representing a `B2Calculator`
#[allow(non_camel_case_types)]
pub struct b2_calculator_t(B2Calculator);

impl Deref for b2_calculator_t {
    type Target = B2Calculator;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Create a slice from a C pointer, allowing NULL pointers for empty slices
unsafe fn slice_from_c<'a, T>(pointer: *const T, len: usize, name: &str) -> Result<&'a [T], Error> {
    if len == 0 {
        return Ok(&[]);
    }

    if pointer.is_null() {
        return Err(Error::InvalidParameter(format!("got invalid NULL pointer for {}", name)));
    }

    return Ok(std::slice::from_raw_parts(pointer, len));
}

/// Copy the B2 values and gradients to the C output buffers
unsafe fn copy_b2_to_c(b2: &B2, values: *mut f64, gradients: *mut f64) {
    let b2_values = b2.values.as_slice().expect("B2 values should be contiguous");
    std::ptr::copy_nonoverlapping(b2_values.as_ptr(), values, b2_values.len());

    let b2_gradients = b2.gradients.as_slice().expect("B2 gradients should be contiguous");
    if !b2_gradients.is_empty() {
        std::ptr::copy_nonoverlapping(b2_gradients.as_ptr(), gradients, b2_gradients.len());
    }
}

/// Create a new B2 calculator with the given `parameters`.
///
/// The `parameters` should be formatted as JSON, for example:
///
/// ```json
/// {
///     "cutoff": 5.0,
///     "max_radial": 8,
///     "max_angular": 3,
///     "species": [1, 2],
///     "radial_basis": {"Chebyshev": {"min_distance": 0.0}},
///     "cutoff_function": {"Quadratic": {}}
/// }
/// ```
///
/// All memory allocated by this function can be released using
/// `b2_calculator_free`.
///
/// @param parameters hyper-parameters of the calculator, JSON-formatted in a
///                   NULL-terminated string
///
/// @returns A pointer to the newly allocated calculator, or a `NULL` pointer in
///          case of error. In case of error, you can use `b2_last_error()`
///          to get the error message.
#[no_mangle]
#[allow(clippy::module_name_repetitions)]
pub unsafe extern fn b2_calculator(parameters: *const c_char) -> *mut b2_calculator_t {
    let mut raw = std::ptr::null_mut();
    let unwind_wrapper = std::panic::AssertUnwindSafe(&mut raw);
    let status = catch_unwind(move || {
        let unwind_wrapper = unwind_wrapper;

        check_pointers!(parameters);
        let parameters = CStr::from_ptr(parameters).to_str()?;
        let calculator = B2Calculator::from_json(parameters)?;
        let boxed = Box::new(b2_calculator_t(calculator));

        *unwind_wrapper.0 = Box::into_raw(boxed);
        Ok(())
    });

    if !status.is_success() {
        return std::ptr::null_mut();
    }

    return raw;
}

/// Free the memory associated with a `calculator` previously created with
/// `b2_calculator`.
///
/// If `calculator` is `NULL`, this function does nothing.
///
/// @param calculator pointer to an existing calculator, or `NULL`
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_calculator_free(calculator: *mut b2_calculator_t) -> b2_status_t {
    catch_unwind(|| {
        if !calculator.is_null() {
            let boxed = Box::from_raw(calculator);
            std::mem::drop(boxed);
        }

        Ok(())
    })
}

/// Get a copy of the parameters used to create this `calculator` in the
/// `parameters` buffer of size `bufflen`, as a JSON-formatted string.
///
/// `parameters` will be NULL-terminated by this function. If the buffer is too
/// small to fit the whole string, this function will return
/// `B2_INVALID_PARAMETER_ERROR`
///
/// @param calculator pointer to an existing calculator
/// @param parameters string buffer to fill with the parameters used to create
///                   this calculator
/// @param bufflen number of characters available in the buffer
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_calculator_parameters(
    calculator: *const b2_calculator_t,
    parameters: *mut c_char,
    bufflen: usize
) -> b2_status_t {
    catch_unwind(|| {
        check_pointers!(calculator, parameters);
        copy_str_to_c(&(*calculator).parameters(), parameters, bufflen)?;
        Ok(())
    })
}

/// Get the sizes of the arrays used by this `calculator`.
///
/// @param calculator pointer to an existing calculator
/// @param n_species number of species (first dimension of the radial
///                  channels)
/// @param n_radial number of radial channels, i.e. `n_species * max_radial`
/// @param n_harmonics number of angular channels, i.e. `(max_angular + 1)^2`
/// @param n_descriptors size of the B2 descriptor
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_calculator_sizes(
    calculator: *const b2_calculator_t,
    n_species: *mut usize,
    n_radial: *mut usize,
    n_harmonics: *mut usize,
    n_descriptors: *mut usize,
) -> b2_status_t {
    catch_unwind(|| {
        check_pointers!(calculator, n_species, n_radial, n_harmonics, n_descriptors);

        let shape = (*calculator).shape();
        *n_species = shape.n_species;
        *n_radial = shape.n_radial();
        *n_harmonics = shape.n_harmonics();
        *n_descriptors = shape.n_descriptors();

        Ok(())
    })
}

/// Compute the B2 descriptor and its gradients for a single atom, using
/// radial and angular basis tables computed by the caller.
///
/// @param calculator pointer to an existing calculator
/// @param n_neighbors number of neighbors of the atom
/// @param species species label of each neighbor (below `n_species`),
///                array of size `n_neighbors`
/// @param radial radial basis table, as a `n_neighbors x max_radial x 4`
///               array, containing the value and gradients of each radial
///               basis function for each neighbor
/// @param angular angular basis table, as a `n_neighbors x n_harmonics x 4`
///                array, containing the value and gradients of each
///                spherical harmonic for each neighbor
/// @param values output array of size `n_descriptors` for the B2 values
/// @param gradients output array of size `n_neighbors x 3 x n_descriptors`
///                  for the B2 gradients
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_compute_from_tables(
    calculator: *const b2_calculator_t,
    n_neighbors: usize,
    species: *const i32,
    radial: *const f64,
    angular: *const f64,
    values: *mut f64,
    gradients: *mut f64,
) -> b2_status_t {
    catch_unwind(|| {
        check_pointers!(calculator, values);
        if n_neighbors != 0 {
            check_pointers!(gradients);
        }

        let calculator = &*calculator;
        let shape = calculator.shape();

        let species = slice_from_c(species, n_neighbors, "species")?.iter()
            .map(|&s| {
                if s < 0 || (s as usize) >= shape.n_species {
                    return Err(Error::InvalidParameter(format!(
                        "species {} is out of range, expected a value below {}",
                        s, shape.n_species
                    )));
                }
                Ok(s as usize)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let radial = slice_from_c(radial, n_neighbors * shape.max_radial * 4, "radial")?;
        let radial = ArrayView3::from_shape((n_neighbors, shape.max_radial, 4), radial)
            .expect("invalid shape for radial table");
        let angular = slice_from_c(angular, n_neighbors * shape.n_harmonics() * 4, "angular")?;
        let angular = ArrayView3::from_shape((n_neighbors, shape.n_harmonics(), 4), angular)
            .expect("invalid shape for angular table");

        let mut bond = SingleBond::new(shape);
        bond.compute(&species, radial, angular);

        let mut b2 = B2::new(shape);
        b2.compute(&bond);

        copy_b2_to_c(&b2, values, gradients);
        Ok(())
    })
}

/// Compute the B2 descriptor and its gradients for a single atom, using the
/// calculator's own radial basis and spherical harmonics.
///
/// @param calculator pointer to an existing calculator
/// @param n_neighbors number of neighbors of the atom
/// @param types atomic type of each neighbor, array of size `n_neighbors`.
///              These must be part of the `species` in the calculator
///              parameters.
/// @param displacements vector from the center to each neighbor, as a
///                      `n_neighbors x 3` array
/// @param values output array of size `n_descriptors` for the B2 values
/// @param gradients output array of size `n_neighbors x 3 x n_descriptors`
///                  for the B2 gradients
///
/// @returns The status code of this operation. If the status is not
///          `B2_SUCCESS`, you can use `b2_last_error()` to get the full
///          error message.
#[no_mangle]
pub unsafe extern fn b2_compute_from_displacements(
    calculator: *const b2_calculator_t,
    n_neighbors: usize,
    types: *const i32,
    displacements: *const f64,
    values: *mut f64,
    gradients: *mut f64,
) -> b2_status_t {
    catch_unwind(|| {
        check_pointers!(calculator, values);
        if n_neighbors != 0 {
            check_pointers!(gradients);
        }

        let calculator = &*calculator;

        let species = slice_from_c(types, n_neighbors, "types")?.iter()
            .map(|&atomic_type| calculator.species().species(atomic_type))
            .collect::<Result<Vec<_>, Error>>()?;

        let displacements = slice_from_c(displacements, 3 * n_neighbors, "displacements")?
            .chunks_exact(3)
            .map(|d| Vector3D::new(d[0], d[1], d[2]))
            .collect::<Vec<_>>();

        let b2 = calculator.compute_atom(&displacements, &species)?;
        copy_b2_to_c(&b2, values, gradients);

        Ok(())
    })
}
